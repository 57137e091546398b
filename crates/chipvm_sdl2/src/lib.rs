use anyhow::{anyhow, Result};
use sdl2::event::Event as SdlEvent;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Texture, WindowCanvas};
use typed_builder::TypedBuilder;

use chipvm_common::{Color, Event, Frontend, Key};
pub use sdl2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    RGB24,
}

#[derive(TypedBuilder)]
pub struct SdlInitInfo {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub title: String,
    #[builder(default = PixelFormat::RGB24)]
    pub pixel_format: PixelFormat,
    #[builder(default = Color::WHITE)]
    pub foreground: Color,
    #[builder(default = Color::BLACK)]
    pub background: Color,
}

/// A window showing the framebuffer scaled up, plus the keyboard feeding it.
pub struct SdlFrontend {
    _sdl_context: sdl2::Sdl,
    event_pump: sdl2::EventPump,
    canvas: WindowCanvas,
    // unsafe_textures: freed together with the renderer
    texture: Texture,
    width: u32,
    pixel_format: PixelFormat,
    foreground: Color,
    background: Color,
    screen_state: Vec<u8>,
}

impl SdlFrontend {
    pub fn new(sdl_init_info: SdlInitInfo) -> Result<Self> {
        let SdlInitInfo {
            width,
            height,
            scale,
            title,
            pixel_format,
            foreground,
            background,
        } = sdl_init_info;
        let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
        let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;
        let window = video_subsystem
            .window(&title, width * scale, height * scale)
            .position_centered()
            .build()?;
        // no vsync: presenting must not hold back the cycle rate
        let canvas = window.into_canvas().accelerated().build()?;
        let creator = canvas.texture_creator();
        let texture =
            creator.create_texture_streaming(map_pixel_format(pixel_format), width, height)?;
        let event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;

        let color_size = map_pixel_format_size(pixel_format);
        log::info!("SDL window '{}' {}x{} at {}x", title, width, height, scale);
        Ok(Self {
            _sdl_context: sdl_context,
            event_pump,
            canvas,
            texture,
            width,
            pixel_format,
            foreground,
            background,
            screen_state: vec![0u8; (width * height * color_size) as usize],
        })
    }
}

impl Frontend for SdlFrontend {
    fn poll_events(&mut self) -> Vec<Event> {
        self.event_pump
            .poll_iter()
            .filter_map(|event| match event {
                SdlEvent::Quit { .. }
                | SdlEvent::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => Some(Event::Quit),
                SdlEvent::KeyDown {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => Some(Event::KeyDown(map_keycode(keycode))),
                SdlEvent::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => Some(Event::KeyUp(map_keycode(keycode))),
                _ => None,
            })
            .collect()
    }

    fn present(&mut self, pixels: &[bool]) -> Result<()> {
        fill_rgb24(
            pixels,
            self.foreground,
            self.background,
            &mut self.screen_state,
        );
        let pitch = (self.width * map_pixel_format_size(self.pixel_format)) as usize;
        self.texture.update(None, &self.screen_state, pitch)?;
        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, None)
            .map_err(|e| anyhow!(e))?;
        self.canvas.present();
        Ok(())
    }

    fn exit(&mut self) {
        log::info!("SDL frontend exit");
    }
}

/// Expand on/off pixels into packed RGB triples.
pub fn fill_rgb24(pixels: &[bool], foreground: Color, background: Color, out: &mut [u8]) {
    for (pixel, rgb) in pixels.iter().zip(out.chunks_exact_mut(3)) {
        let color = if *pixel { foreground } else { background };
        let (r, g, b) = color.rgb();
        rgb.copy_from_slice(&[r, g, b]);
    }
}

pub fn map_pixel_format(pixel_format: PixelFormat) -> PixelFormatEnum {
    match pixel_format {
        PixelFormat::RGB24 => PixelFormatEnum::RGB24,
    }
}

pub fn map_pixel_format_size(pixel_format: PixelFormat) -> u32 {
    match pixel_format {
        PixelFormat::RGB24 => 3,
    }
}

pub fn map_keycode(keycode: Keycode) -> Key {
    match keycode {
        Keycode::Num1 => Key::Num1,
        Keycode::Num2 => Key::Num2,
        Keycode::Num3 => Key::Num3,
        Keycode::Num4 => Key::Num4,
        Keycode::Q => Key::Q,
        Keycode::W => Key::W,
        Keycode::E => Key::E,
        Keycode::R => Key::R,
        Keycode::A => Key::A,
        Keycode::S => Key::S,
        Keycode::D => Key::D,
        Keycode::F => Key::F,
        Keycode::Z => Key::Z,
        Keycode::X => Key::X,
        Keycode::C => Key::C,
        Keycode::V => Key::V,
        Keycode::P => Key::P,
        Keycode::N => Key::N,
        Keycode::Escape => Key::Escape,
        _ => Key::Unknown,
    }
}
