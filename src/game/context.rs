use std::sync::{Arc, atomic::AtomicBool};

use wgpu::{
    CreateSurfaceError, Device, DeviceDescriptor, PollType, Queue, RequestAdapterError,
    RequestAdapterOptions, RequestDeviceError, Surface, SurfaceConfiguration, TextureFormat,
    TextureViewDescriptor,
};
use winit::{
    application::ApplicationHandler,
    error::{EventLoopError, OsError},
    event::{KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::game::Game;

/// Anything that can go wrong before the first frame. Startup failures are
/// fatal; the process reports them and exits with a failure code.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] OsError),
    #[error("failed to get adapter: {0}")]
    Adapter(#[from] RequestAdapterError),
    #[error("failed to get device: {0}")]
    Device(#[from] RequestDeviceError),
    #[error("failed to create surface: {0}")]
    Surface(#[from] CreateSurfaceError),
    #[error("surface is incompatible with the adapter")]
    SurfaceConfig,
    #[error("failed to read font file: {0}")]
    FontFile(#[from] std::io::Error),
    #[error("failed to parse font: {0}")]
    FontFace(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct GameContext<'a> {
    pub window: &'a Window,
    pub device: &'a Device,
    pub queue: &'a Queue,
    pub surface_format: TextureFormat,
    should_exit: Option<&'a AtomicBool>,
}

#[derive(Debug)]
pub enum GameEvent {
    CloseRequested,
    Key { code: KeyCode, is_held: bool },
}

pub fn run() -> Result<(), InitError> {
    let event_loop = EventLoop::new()?;
    let mut runner = Runner::Uninit;
    event_loop.run_app(&mut runner)?;

    match runner {
        Runner::Failed(err) => Err(err),
        _ => Ok(()),
    }
}

enum Runner {
    Uninit,
    Init(InitRunner),
    Failed(InitError),
}

struct InitRunner {
    window: Arc<Window>,
    device: Device,
    queue: Queue,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    game: Game,
}

impl<'a> GameContext<'a> {
    pub fn exit(&self) {
        if let Some(should_exit) = self.should_exit {
            should_exit.store(true, std::sync::atomic::Ordering::Relaxed);
        } else {
            panic!("cannot exit the game from this context");
        }
    }
}

impl ApplicationHandler for Runner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if matches!(self, Runner::Uninit) {
            *self = match InitRunner::new(event_loop) {
                Ok(runner) => Runner::Init(runner),
                Err(err) => {
                    event_loop.exit();
                    Runner::Failed(err)
                }
            };
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        if let Runner::Init(runner) = self {
            runner.window_event(event_loop, event);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Runner::Init(runner) = self {
            runner.about_to_wait(event_loop);
        }
    }
}

impl InitRunner {
    fn new(event_loop: &ActiveEventLoop) -> Result<Self, InitError> {
        let window = Arc::new(event_loop.create_window(Game::window_attributes())?);

        let instance = wgpu::Instance::default();

        let adapter = pollster::block_on(instance.request_adapter(&RequestAdapterOptions::default()))?;

        let (device, queue) =
            pollster::block_on(adapter.request_device(&DeviceDescriptor::default()))?;

        let surface = instance.create_surface(window.clone())?;

        let surface_config = surface
            .get_default_config(
                &adapter,
                window.inner_size().width,
                window.inner_size().height,
            )
            .ok_or(InitError::SurfaceConfig)?;

        surface.configure(&device, &surface_config);

        let game = Game::new(GameContext {
            window: &window,
            device: &device,
            queue: &queue,
            surface_format: surface_config.format,
            should_exit: None,
        })?;

        Ok(Self {
            window,
            device,
            queue,
            surface,
            surface_config,
            game,
        })
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, event: WindowEvent) {
        let game_event = match &event {
            WindowEvent::CloseRequested => Some(GameEvent::CloseRequested),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => Some(GameEvent::Key {
                code: *code,
                is_held: state.is_pressed(),
            }),

            _ => None,
        };

        if let Some(game_event) = &game_event {
            let should_exit = AtomicBool::new(false);

            self.game.event(
                game_event,
                GameContext {
                    window: &self.window,
                    device: &self.device,
                    queue: &self.queue,
                    surface_format: self.surface_config.format,
                    should_exit: Some(&should_exit),
                },
            );

            if should_exit.load(std::sync::atomic::Ordering::Relaxed) {
                self.game.end();
                event_loop.exit();
                return;
            }
        }

        match &event {
            WindowEvent::RedrawRequested => {
                let Ok(surface_texture) = self.surface.get_current_texture() else {
                    return;
                };

                self.game.render(
                    &surface_texture
                        .texture
                        .create_view(&TextureViewDescriptor::default()),
                    GameContext {
                        window: &self.window,
                        device: &self.device,
                        queue: &self.queue,
                        surface_format: self.surface_config.format,
                        should_exit: None,
                    },
                );

                self.window.pre_present_notify();
                surface_texture.present();

                if let Err(err) = self.device.poll(PollType::Poll) {
                    log::error!("failed to poll device: {err}");
                }
            }

            WindowEvent::Resized(new_size) => {
                self.surface_config.width = new_size.width;
                self.surface_config.height = new_size.height;
                self.surface.configure(&self.device, &self.surface_config);
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let should_exit = AtomicBool::new(false);

        self.game.update(GameContext {
            window: &self.window,
            device: &self.device,
            queue: &self.queue,
            surface_format: self.surface_config.format,
            should_exit: Some(&should_exit),
        });

        if should_exit.load(std::sync::atomic::Ordering::Relaxed) {
            self.game.end();
            event_loop.exit();
            return;
        }

        self.window.request_redraw();
    }
}
