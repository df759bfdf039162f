pub mod draw;
pub mod realms;
pub mod renderer;
pub mod surface;
pub mod text;

pub use renderer::{FrameInput, RendererError, SceneView, WallRenderer};
pub use surface::{DisplaySurface, HeadlessSurface, SurfaceError};
pub use text::TextRenderer;
