use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use app_api::{RepaintHandle, UiApp};
use bus::{Bus, CoreCommand};
use egui::{Context as EguiContext, viewport::ViewportId};
use egui_wgpu::{Renderer as EguiWgpuRenderer, ScreenDescriptor, wgpu};
use egui_winit::State as EguiWinitState;
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to open graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no usable texture format")]
    NoSurfaceFormat,
}

#[derive(Clone, Copy, Debug)]
pub struct RunOptions {
    /// Initial inner size in logical pixels.
    pub width: u32,
    pub height: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

#[derive(Debug)]
enum UserEvent {
    /// A runtime posted to the event side of the bus.
    CoreEvents,
    Repaint,
}

/// Open the window and drive `app` until it exits or the window is closed.
pub fn run(mut app: Box<dyn UiApp>, opts: RunOptions) -> Result<(), PlatformError> {
    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
    let proxy = event_loop.create_proxy();

    let (bus, cmd_rx) = Bus::new();
    let wake_proxy = proxy.clone();
    let timers = runtime_timer::start_timer_runtime(
        cmd_rx,
        bus.evt_tx.clone(),
        Box::new(move || {
            let _ = wake_proxy.send_event(UserEvent::CoreEvents);
        }),
    );

    app.set_bus_sender(bus.cmd_tx.clone());
    let repaint_proxy = proxy;
    app.set_repaint_handle(RepaintHandle::new(move || {
        let _ = repaint_proxy.send_event(UserEvent::Repaint);
    }));

    let mut host = PlatformApp {
        app,
        bus,
        opts,
        timers: Some(timers),
        window: None,
        title: String::new(),
        egui_ctx: None,
        egui_state: None,
        gpu: None,
        next_repaint: None,
        error: None,
    };
    event_loop.run_app(&mut host)?;

    if let Some(handle) = host.timers.take() {
        if handle.join().is_err() {
            log::warn!(target: "platform", "timer runtime panicked");
        }
    }
    match host.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: EguiWgpuRenderer,
}

struct PlatformApp {
    app: Box<dyn UiApp>,
    bus: Bus,
    opts: RunOptions,
    timers: Option<JoinHandle<()>>,

    window: Option<Arc<Window>>,
    title: String,
    egui_ctx: Option<EguiContext>,
    egui_state: Option<EguiWinitState>,
    gpu: Option<Gpu>,
    /// When egui last asked to be run again, if not immediately.
    next_repaint: Option<Instant>,
    error: Option<PlatformError>,
}

impl PlatformApp {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), PlatformError> {
        let window = match &self.window {
            Some(w) => Arc::clone(w),
            None => {
                self.title = self.app.title();
                let attrs = Window::default_attributes()
                    .with_title(self.title.clone())
                    .with_inner_size(LogicalSize::new(self.opts.width, self.opts.height));
                let w = Arc::new(event_loop.create_window(attrs)?);
                self.window = Some(Arc::clone(&w));
                w
            }
        };

        if self.egui_ctx.is_none() || self.egui_state.is_none() {
            let ctx = EguiContext::default();
            let state = EguiWinitState::new(
                ctx.clone(),
                ViewportId::ROOT,
                &window,
                Some(window.scale_factor() as f32),
                None,
                None,
            );
            self.egui_ctx = Some(ctx);
            self.egui_state = Some(state);
        }

        if self.gpu.is_none() {
            self.gpu = Some(create_gpu(&window)?);
        }
        window.request_redraw();
        Ok(())
    }

    fn drain_core_events(&mut self) {
        let mut any = false;
        while let Ok(evt) = self.bus.evt_rx.try_recv() {
            self.app.on_core_event(evt);
            any = true;
        }
        if any {
            self.request_redraw();
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(ctx), Some(state), Some(gpu)) = (
            self.window.as_ref(),
            self.egui_ctx.as_ref(),
            self.egui_state.as_mut(),
            self.gpu.as_mut(),
        ) else {
            return;
        };

        // 1) Acquire frame
        let frame = match gpu.surface.get_current_texture() {
            Ok(x) => x,
            Err(wgpu::SurfaceError::Lost) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(wgpu::SurfaceError::Outdated) => return,
            Err(e) => {
                log::error!(target: "platform", "surface error: {e:?}");
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // 2) Egui pass
        let raw_input = state.take_egui_input(window);
        ctx.begin_pass(raw_input);
        self.app.ui(ctx);
        let full_output = ctx.end_pass();
        state.handle_platform_output(window, full_output.platform_output);

        let repaint_delay = full_output
            .viewport_output
            .get(&ViewportId::ROOT)
            .map(|v| v.repaint_delay)
            .unwrap_or(Duration::MAX);

        // 3) Tessellate and upload
        let clipped = ctx.tessellate(full_output.shapes, ctx.pixels_per_point());
        for (id, delta) in &full_output.textures_delta.set {
            gpu.renderer
                .update_texture(&gpu.device, &gpu.queue, *id, delta);
        }

        // 4) Encode draw
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        let screen = ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: ctx.pixels_per_point(),
        };
        gpu.renderer
            .update_buffers(&gpu.device, &gpu.queue, &mut encoder, &clipped, &screen);
        {
            let rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            gpu.renderer
                .render(&mut rpass.forget_lifetime(), &clipped, &screen);
        }
        for id in full_output.textures_delta.free {
            gpu.renderer.free_texture(&id);
        }

        // 5) Submit & present
        gpu.queue.submit(Some(encoder.finish()));
        frame.present();

        let title = self.app.title();
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }

        if repaint_delay.is_zero() {
            window.request_redraw();
            self.next_repaint = None;
        } else {
            self.next_repaint = Instant::now().checked_add(repaint_delay);
        }

        if self.app.wants_exit() {
            event_loop.exit();
        }
    }
}

fn create_gpu(window: &Arc<Window>) -> Result<Gpu, PlatformError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let surface = instance.create_surface(Arc::clone(window))?;

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        force_fallback_adapter: false,
        compatible_surface: Some(&surface),
    }))?;

    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("device"),
        required_features: wgpu::Features::empty(),
        required_limits: wgpu::Limits::default(),
        memory_hints: wgpu::MemoryHints::Performance,
        trace: wgpu::Trace::default(),
    }))?;

    let caps = surface.get_capabilities(&adapter);
    let format = caps
        .formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| caps.formats.first().copied())
        .ok_or(PlatformError::NoSurfaceFormat)?;
    let alpha_mode = caps
        .alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    let size = window.inner_size();
    let config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    surface.configure(&device, &config);

    let renderer = EguiWgpuRenderer::new(&device, format, None, 1, true);
    log::debug!(target: "platform", "surface configured: {format:?} {}x{}", config.width, config.height);

    Ok(Gpu {
        surface,
        device,
        queue,
        config,
        renderer,
    })
}

impl ApplicationHandler<UserEvent> for PlatformApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(err) = self.init(event_loop) {
            log::error!(target: "platform", "{err}");
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::CoreEvents => self.drain_core_events(),
            UserEvent::Repaint => self.request_redraw(),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let (Some(window), Some(state)) = (self.window.as_ref(), self.egui_state.as_mut()) {
            let response = state.on_window_event(window, &event);
            if response.repaint {
                window.request_redraw();
            }
        }
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.config.width = new_size.width.max(1);
                    gpu.config.height = new_size.height.max(1);
                    gpu.surface.configure(&gpu.device, &gpu.config);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        match self.next_repaint {
            Some(at) if at <= Instant::now() => {
                self.next_repaint = None;
                self.request_redraw();
                event_loop.set_control_flow(ControlFlow::Wait);
            }
            Some(at) => event_loop.set_control_flow(ControlFlow::WaitUntil(at)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.app.on_exit();
        if self.bus.cmd_tx.send(CoreCommand::Shutdown).is_err() {
            log::debug!(target: "platform", "timer runtime already stopped");
        }
    }
}
