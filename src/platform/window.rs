//! Fullscreen wall window
//!
//! A single top-level Win32 window that the frame loop presents into with
//! `StretchDIBits`. Keyboard messages are translated to [`InputEvent`]s in
//! the window procedure and queued per thread; [`WindowInput`] drains that
//! queue after pumping the message loop.
//!
//! Everything here must run on the thread that created the window.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::c_void;

use thiserror::Error;
use tiny_skia::Pixmap;
use windows::core::w;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    GetDC, GetMonitorInfoW, MonitorFromWindow, ReleaseDC, StretchDIBits, BITMAPINFO,
    BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, MONITORINFO, MONITOR_DEFAULTTONEAREST, SRCCOPY,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::HiDpi::{
    SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
};
use windows::Win32::UI::Input::KeyboardAndMouse::SetFocus;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetClientRect,
    GetWindowRect, LoadCursorW, PeekMessageW, RegisterClassW, SetWindowLongW, SetWindowPos,
    ShowWindow, TranslateMessage, CW_USEDEFAULT, GWL_STYLE, HWND_TOP, IDC_ARROW, MSG, PM_REMOVE,
    SWP_FRAMECHANGED, SWP_NOOWNERZORDER, SW_SHOW, WINDOW_EX_STYLE, WM_CLOSE, WM_DESTROY,
    WM_KEYDOWN, WM_QUIT, WNDCLASSW, WS_OVERLAPPEDWINDOW, WS_POPUP, WS_VISIBLE,
};

use crate::input::{InputEvent, InputSource};
use crate::ui::{DisplaySurface, SurfaceError};

/// Win32 window errors
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Failed to get module handle")]
    ModuleHandleFailed,

    #[error("Failed to create the wall window")]
    WindowCreationFailed,

    #[error("Failed to acquire window device context")]
    DeviceContextFailed,

    #[error("StretchDIBits copied no scan lines")]
    BlitFailed,

    #[error("Failed to query monitor bounds")]
    MonitorInfoFailed,

    #[error("Failed to reposition window")]
    PositionFailed,
}

thread_local! {
    /// Events produced by the window procedure, drained by [`WindowInput`]
    static PENDING_INPUT: RefCell<VecDeque<InputEvent>> = RefCell::new(VecDeque::new());
}

fn push_input(event: InputEvent) {
    PENDING_INPUT.with(|queue| queue.borrow_mut().push_back(event));
}

unsafe extern "system" fn wall_window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_KEYDOWN => {
            if let Some(event) = InputEvent::from_vk_code(wparam.0 as u32) {
                push_input(event);
            }
            LRESULT(0)
        }
        // Closing the window is a quit request; the window is destroyed on drop
        WM_CLOSE => {
            push_input(InputEvent::Quit);
            LRESULT(0)
        }
        WM_DESTROY => LRESULT(0),
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

/// The wall's top-level window
#[derive(Debug)]
pub struct WallWindow {
    hwnd: HWND,
    fullscreen: bool,
    windowed_rect: RECT,
    /// BGRA staging buffer reused between frames
    staging: Vec<u8>,
}

impl WallWindow {
    /// Creates and shows the window, optionally fullscreen on its monitor
    pub fn create(width: u32, height: u32, fullscreen: bool) -> Result<Self, PlatformError> {
        let class_name = w!("MotiBeamWallWindow");

        unsafe {
            // Already-set awareness is not an error worth stopping for
            let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);

            let hinstance = GetModuleHandleW(None).map_err(|_| PlatformError::ModuleHandleFailed)?;

            let wc = WNDCLASSW {
                lpfnWndProc: Some(wall_window_proc),
                hInstance: hinstance.into(),
                lpszClassName: class_name,
                hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
                ..Default::default()
            };
            // Zero means the class exists already, which is fine on re-creation
            RegisterClassW(&wc);

            let hwnd = CreateWindowExW(
                WINDOW_EX_STYLE(0),
                class_name,
                w!("MotiBeam Spatial OS"),
                WS_OVERLAPPEDWINDOW | WS_VISIBLE,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                width as i32,
                height as i32,
                None,
                None,
                hinstance,
                None,
            );
            if hwnd.0 == 0 {
                return Err(PlatformError::WindowCreationFailed);
            }

            ShowWindow(hwnd, SW_SHOW);
            let _ = SetFocus(hwnd);

            let mut window = Self {
                hwnd,
                fullscreen: false,
                windowed_rect: RECT::default(),
                staging: Vec::new(),
            };

            if fullscreen {
                window.enter_fullscreen()?;
            }

            tracing::info!(width, height, fullscreen, "wall window created");
            Ok(window)
        }
    }

    fn enter_fullscreen(&mut self) -> Result<(), PlatformError> {
        unsafe {
            let mut current = RECT::default();
            if GetWindowRect(self.hwnd, &mut current).is_ok() {
                self.windowed_rect = current;
            }

            let monitor = MonitorFromWindow(self.hwnd, MONITOR_DEFAULTTONEAREST);
            let mut info = MONITORINFO {
                cbSize: std::mem::size_of::<MONITORINFO>() as u32,
                ..Default::default()
            };
            if !GetMonitorInfoW(monitor, &mut info).as_bool() {
                return Err(PlatformError::MonitorInfoFailed);
            }

            let bounds = info.rcMonitor;
            SetWindowLongW(self.hwnd, GWL_STYLE, (WS_POPUP | WS_VISIBLE).0 as i32);
            SetWindowPos(
                self.hwnd,
                HWND_TOP,
                bounds.left,
                bounds.top,
                bounds.right - bounds.left,
                bounds.bottom - bounds.top,
                SWP_FRAMECHANGED | SWP_NOOWNERZORDER,
            )
            .map_err(|_| PlatformError::PositionFailed)?;
        }
        self.fullscreen = true;
        Ok(())
    }

    fn leave_fullscreen(&mut self) -> Result<(), PlatformError> {
        let r = self.windowed_rect;
        unsafe {
            SetWindowLongW(self.hwnd, GWL_STYLE, (WS_OVERLAPPEDWINDOW | WS_VISIBLE).0 as i32);
            SetWindowPos(
                self.hwnd,
                HWND_TOP,
                r.left,
                r.top,
                (r.right - r.left).max(320),
                (r.bottom - r.top).max(180),
                SWP_FRAMECHANGED | SWP_NOOWNERZORDER,
            )
            .map_err(|_| PlatformError::PositionFailed)?;
        }
        self.fullscreen = false;
        Ok(())
    }

    /// Copies a frame into the client area, scaling if sizes differ
    fn blit(&mut self, pixmap: &Pixmap) -> Result<(), PlatformError> {
        let (src_w, src_h) = (pixmap.width() as i32, pixmap.height() as i32);
        let (dst_w, dst_h) = self.client_size();

        // tiny-skia is RGBA, GDI wants BGRA
        self.staging.clear();
        self.staging.extend_from_slice(pixmap.data());
        for px in self.staging.chunks_exact_mut(4) {
            px.swap(0, 2);
        }

        let mut bitmap_info = BITMAPINFO::default();
        bitmap_info.bmiHeader = BITMAPINFOHEADER {
            biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: src_w,
            biHeight: -src_h, // top-down
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB.0,
            ..Default::default()
        };

        unsafe {
            let hdc = GetDC(self.hwnd);
            if hdc.0 == 0 {
                return Err(PlatformError::DeviceContextFailed);
            }
            let lines = StretchDIBits(
                hdc,
                0,
                0,
                dst_w as i32,
                dst_h as i32,
                0,
                0,
                src_w,
                src_h,
                Some(self.staging.as_ptr() as *const c_void),
                &bitmap_info,
                DIB_RGB_COLORS,
                SRCCOPY,
            );
            ReleaseDC(self.hwnd, hdc);

            if lines == 0 {
                return Err(PlatformError::BlitFailed);
            }
        }
        Ok(())
    }

    fn client_size(&self) -> (u32, u32) {
        let mut rect = RECT::default();
        unsafe {
            if GetClientRect(self.hwnd, &mut rect).is_err() {
                return (1, 1);
            }
        }
        (
            (rect.right - rect.left).max(1) as u32,
            (rect.bottom - rect.top).max(1) as u32,
        )
    }
}

impl DisplaySurface for WallWindow {
    fn size(&self) -> (u32, u32) {
        self.client_size()
    }

    fn present(&mut self, frame: &Pixmap) -> Result<(), SurfaceError> {
        self.blit(frame).map_err(|err| SurfaceError::PresentFailed(err.to_string()))
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), SurfaceError> {
        if fullscreen == self.fullscreen {
            return Ok(());
        }
        let result = if fullscreen {
            self.enter_fullscreen()
        } else {
            self.leave_fullscreen()
        };
        result.map_err(|err| SurfaceError::FullscreenFailed(err.to_string()))
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }
}

impl Drop for WallWindow {
    fn drop(&mut self) {
        unsafe {
            let _ = DestroyWindow(self.hwnd);
        }
        tracing::debug!("wall window destroyed");
    }
}

/// Input from the window's message queue
#[derive(Debug, Default)]
pub struct WindowInput;

impl WindowInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for WindowInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        unsafe {
            let mut msg = MSG::default();
            while PeekMessageW(&mut msg, HWND(0), 0, 0, PM_REMOVE).as_bool() {
                if msg.message == WM_QUIT {
                    push_input(InputEvent::Quit);
                    break;
                }
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
        PENDING_INPUT.with(|queue| queue.borrow_mut().drain(..).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_events_drain_in_order() {
        push_input(InputEvent::CycleMode);
        push_input(InputEvent::Quit);
        let drained: Vec<_> = PENDING_INPUT.with(|queue| queue.borrow_mut().drain(..).collect());
        assert_eq!(drained, vec![InputEvent::CycleMode, InputEvent::Quit]);
    }
}
