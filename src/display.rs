//! SDL2 window that presents the painted canvas and reports key presses.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

pub const FPS: u64 = 60;
pub const FRAME_TARGET_TIME: u64 = 1000 / FPS;

/// Viewer commands bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Pan { dx: i8, dy: i8 },
    ZoomIn,
    ZoomOut,
    /// Rotate the window about an axis; `reverse` when Shift is held.
    RotateX { reverse: bool },
    RotateY { reverse: bool },
    RotateZ { reverse: bool },
    ToggleClipping,
    ToggleProjection,
    ToggleAxes,
    Snapshot,
}

fn command_for(key: Keycode, shift: bool) -> Option<Command> {
    let command = match key {
        Keycode::Escape | Keycode::Q => Command::Quit,
        Keycode::Left => Command::Pan { dx: -1, dy: 0 },
        Keycode::Right => Command::Pan { dx: 1, dy: 0 },
        Keycode::Up => Command::Pan { dx: 0, dy: 1 },
        Keycode::Down => Command::Pan { dx: 0, dy: -1 },
        Keycode::Plus | Keycode::Equals | Keycode::KpPlus => Command::ZoomIn,
        Keycode::Minus | Keycode::KpMinus => Command::ZoomOut,
        Keycode::X => Command::RotateX { reverse: shift },
        Keycode::Y => Command::RotateY { reverse: shift },
        Keycode::Z => Command::RotateZ { reverse: shift },
        Keycode::C => Command::ToggleClipping,
        Keycode::P => Command::ToggleProjection,
        Keycode::A => Command::ToggleAxes,
        Keycode::S => Command::Snapshot,
        _ => return None,
    };
    Some(command)
}

pub struct Display {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    // Declared before `texture_creator` so it is dropped first.
    texture: sdl2::render::Texture<'static>,
    #[allow(dead_code)]
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    event_pump: sdl2::EventPump,
    timer_subsystem: sdl2::TimerSubsystem,
    previous_frame_time: u64,
    width: u32,
    height: u32,
}

impl Display {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;
        let timer_subsystem = sdl_context.timer()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        // SAFETY: texture_creator is heap-allocated and lives as long as
        // Display; field order drops the texture first.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;

        let previous_frame_time = timer_subsystem.ticks64();
        Ok(Self {
            canvas,
            texture,
            texture_creator,
            event_pump,
            timer_subsystem,
            previous_frame_time,
            width,
            height,
        })
    }

    /// Drains pending events into viewer commands.
    pub fn poll_commands(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => commands.push(Command::Quit),
                Event::KeyDown {
                    keycode: Some(key),
                    keymod,
                    ..
                } => {
                    let shift = keymod.intersects(sdl2::keyboard::Mod::LSHIFTMOD | sdl2::keyboard::Mod::RSHIFTMOD);
                    commands.extend(command_for(key, shift));
                }
                _ => {}
            }
        }
        commands
    }

    pub fn present(&mut self, buffer: &[u8]) -> Result<(), String> {
        self.texture
            .update(None, buffer, (self.width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(0, 0, self.width, self.height)))?;
        self.canvas.present();
        Ok(())
    }

    /// Sleeps off the rest of the frame budget.
    pub fn wait_for_next_frame(&mut self) {
        let elapsed = self.timer_subsystem.ticks64() - self.previous_frame_time;
        if elapsed < FRAME_TARGET_TIME {
            std::thread::sleep(std::time::Duration::from_millis(FRAME_TARGET_TIME - elapsed));
        }
        self.previous_frame_time = self.timer_subsystem.ticks64();
    }
}
