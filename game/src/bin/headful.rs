use std::{
    sync::mpsc,
    time::{Duration, Instant},
};

use engine::graphics::CpuRenderer;
use engine::pixels_surface::PixelsSurface;
use engine::surface::{Surface, SurfaceSize};
use pixels::{PixelsBuilder, SurfaceTexture, wgpu::PresentMode};
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use game::detection::{DetectionLink, DetectionSignal, NullLink};
use game::detection_http::HttpDetectionLink;
use game::motion_api;
use game::phase::{GameEffect, GameEvent, GamePhase};
use game::settings::SettingsStore;
use game::trace_core::TraceCore;
use game::trace_ui::draw_scene;

/// Maps a keypress to a controller event. Space is contextual: it starts
/// from Idle, confirms a finished level, and dismisses an abort message.
fn control_event(key: VirtualKeyCode, phase: &GamePhase) -> Option<GameEvent> {
    match key {
        VirtualKeyCode::Space | VirtualKeyCode::Return => match phase {
            GamePhase::Idle => Some(GameEvent::Start),
            GamePhase::LevelTransition => Some(GameEvent::ConfirmLevel),
            GamePhase::Aborted { .. } => Some(GameEvent::AcknowledgeError),
            GamePhase::Running | GamePhase::AllLevelsComplete => None,
        },
        VirtualKeyCode::S => Some(GameEvent::Stop),
        VirtualKeyCode::R => Some(GameEvent::Reset),
        VirtualKeyCode::L => Some(GameEvent::RestartLevel),
        _ => None,
    }
}

/// Owns the core and executes its effects: detection signals go out the
/// link, announcements schedule the automatic confirm when auto-advance
/// is on, and the post-transition `StartDetection` is deferred by the
/// settle delay so the freshly reset feed isn't watched immediately.
struct Driver {
    core: TraceCore,
    link: Box<dyn DetectionLink>,
    auto_advance: bool,
    settle_delay: Duration,
    pending_start: Option<Instant>,
    pending_confirm: Option<Instant>,
}

impl Driver {
    fn new(
        core: TraceCore,
        link: Box<dyn DetectionLink>,
        auto_advance: bool,
        settle_delay: Duration,
    ) -> Self {
        Self {
            core,
            link,
            auto_advance,
            settle_delay,
            pending_start: None,
            pending_confirm: None,
        }
    }

    fn core(&self) -> &TraceCore {
        &self.core
    }

    fn apply_event(&mut self, event: GameEvent, now: Instant) {
        let defer_start = matches!(event, GameEvent::ConfirmLevel);
        let effects = self.core.handle(event);
        self.apply_effects(effects, defer_start, now);
    }

    fn frame(&mut self, dt: Duration, now: Instant) {
        if self.pending_start.is_some_and(|t| now >= t) {
            self.pending_start = None;
            self.link.send(DetectionSignal::StartDetection);
        }
        if self.pending_confirm.is_some_and(|t| now >= t) {
            self.pending_confirm = None;
            self.apply_event(GameEvent::ConfirmLevel, now);
        }

        let effects = self.core.tick(dt);
        self.apply_effects(effects, false, now);
    }

    fn apply_effects(&mut self, effects: Vec<GameEffect>, defer_start: bool, now: Instant) {
        for effect in effects {
            match effect {
                GameEffect::Announce { .. } => {
                    if self.auto_advance {
                        self.pending_confirm = Some(now);
                    }
                }
                GameEffect::StartDetection if defer_start && !self.settle_delay.is_zero() => {
                    self.pending_start = Some(now + self.settle_delay);
                }
                effect => {
                    if matches!(effect, GameEffect::StopDetection) {
                        // Detection is being turned off; a deferred start
                        // must not revive it.
                        self.pending_start = None;
                    }
                    if let Some(signal) = effect.detection_signal() {
                        self.link.send(signal);
                    }
                }
            }
        }
    }
}

fn main() {
    env_logger::init();

    let settings = SettingsStore::from_env().load();
    let show_countdown = settings.gameplay.show_countdown;

    let (motion_tx, motion_rx) = mpsc::channel();
    let mut _bridge_runtime = None;
    let link: Box<dyn DetectionLink> = if settings.detection.enabled {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("build detection bridge runtime");
        let addr = motion_api::resolve_motion_api_addr(|k| std::env::var(k).ok());
        let tx = motion_tx.clone();
        runtime.spawn(async move {
            if let Err(err) = motion_api::serve(addr, tx).await {
                log::error!("motion api failed: {err}");
            }
        });
        let link = HttpDetectionLink::new(runtime.handle().clone(), settings.detection.endpoint.clone());
        _bridge_runtime = Some(runtime);
        Box::new(link)
    } else {
        log::info!("detection disabled; running without a motion feed");
        Box::new(NullLink)
    };
    drop(motion_tx);

    let core = TraceCore::new(
        game::path::TracePath::rectangle(),
        settings.gameplay.level_set.table(),
    );
    let mut driver = Driver::new(
        core,
        link,
        settings.gameplay.auto_advance_levels,
        settings.detection.settle_delay(),
    );

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Stillpath")
        .with_inner_size(LogicalSize::new(
            settings.window.width as f64,
            settings.window.height as f64,
        ))
        .build(&event_loop)
        .expect("create game window");

    let window_size = window.inner_size();
    let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
    let present_mode = if settings.window.vsync {
        PresentMode::AutoVsync
    } else {
        PresentMode::AutoNoVsync
    };
    let pixels = PixelsBuilder::new(settings.window.width, settings.window.height, surface_texture)
        .present_mode(present_mode)
        .build()
        .expect("create pixel buffer");
    let mut surface = PixelsSurface::new(
        pixels,
        SurfaceSize::new(settings.window.width, settings.window.height),
    )
    .expect("size pixel buffer");

    let mut last_frame = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                WindowEvent::Resized(new_size) => {
                    if let Err(err) =
                        surface.resize(SurfaceSize::new(new_size.width, new_size.height))
                    {
                        log::error!("resize failed: {err}");
                        *control_flow = ControlFlow::Exit;
                    }
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => {
                    if key == VirtualKeyCode::Escape {
                        *control_flow = ControlFlow::Exit;
                    } else if let Some(game_event) = control_event(key, driver.core().phase()) {
                        driver.apply_event(game_event, Instant::now());
                    }
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                let now = Instant::now();
                let dt = now - last_frame;
                last_frame = now;

                for motion in motion_rx.try_iter() {
                    driver.apply_event(
                        GameEvent::MotionDetected {
                            message: motion.message,
                        },
                        now,
                    );
                }

                driver.frame(dt, now);
                window.request_redraw();
            }
            Event::RedrawRequested(_) => {
                let size = surface.size();
                let mut snap = driver.core().snapshot();
                if !show_countdown {
                    snap.seconds_remaining = None;
                }
                {
                    let mut renderer = CpuRenderer::new(surface.frame_mut(), size);
                    draw_scene(&mut renderer, driver.core().path(), &snap);
                }
                if let Err(err) = surface.present() {
                    log::error!("present failed: {err}");
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => {}
        }
    });
}
