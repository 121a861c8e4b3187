use winit::event::{ElementState, VirtualKeyCode};

/// Drawing surface driven once per loop iteration.
pub trait FrameTarget {
    type Error;

    fn clear(&mut self);
    fn draw(&mut self);
    fn present(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub struct FrameLoop {
    escape: ElementState,
    close_requested: bool,
    frames: u64,
    max_frames: Option<u64>,
}

impl FrameLoop {
    pub fn new(max_frames: Option<u64>) -> Self {
        Self {
            escape: ElementState::Released,
            close_requested: false,
            frames: 0,
            max_frames,
        }
    }

    pub fn key_input(&mut self, key: VirtualKeyCode, state: ElementState) {
        if key == VirtualKeyCode::Escape {
            self.escape = state;
        }
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn should_close(&self) -> bool {
        self.close_requested
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn limit_reached(&self) -> bool {
        self.max_frames.is_some_and(|max| self.frames >= max)
    }

    ///
    /// Runs a single iteration: input check, clear, draw, present.
    ///
    /// A close flag raised between iterations ends the loop before anything
    /// is drawn; one raised by Escape lets the current frame finish.
    ///
    pub fn run_frame<T: FrameTarget>(&mut self, target: &mut T) -> Result<LoopControl, T::Error> {
        if self.limit_reached() {
            self.close_requested = true;
        }

        if self.close_requested {
            return Ok(LoopControl::Exit);
        }

        if self.escape == ElementState::Pressed {
            self.close_requested = true;
        }

        target.clear();
        target.draw();
        target.present()?;

        self.frames += 1;

        if self.limit_reached() {
            log::info!("frame limit of {} reached", self.frames);
            self.close_requested = true;
        }

        if self.close_requested {
            Ok(LoopControl::Exit)
        } else {
            Ok(LoopControl::Continue)
        }
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(None)
    }
}
