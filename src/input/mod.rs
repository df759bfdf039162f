pub mod keyboard;
pub mod source;

pub use keyboard::InputEvent;
pub use source::{InputSource, ScriptError, ScriptedInput};
