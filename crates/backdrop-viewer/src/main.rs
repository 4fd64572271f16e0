//! Entry point for the point-cloud backdrop.

use anyhow::Result;
use backdrop_viewer::{app::App, config::Config, headless};
use clap::Parser;
use std::sync::Arc;
use winit::{
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

fn main() -> Result<()> {
    // Initialize logging; default to "info" if RUST_LOG is unset.
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let config = Config::parse();
    config.validate()?;
    log::info!("Starting with {:?}", config);

    if config.headless {
        let report = headless::run(&config);
        log::info!(
            "Headless run done: {} frames, {} uploads, {} points, heights [{:.2}, {:.2}]",
            report.frames,
            report.uploads,
            report.points,
            report.height_range.0,
            report.height_range.1
        );
        return Ok(());
    }

    // Create the event loop and window.
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
            .build(&event_loop)?,
    );

    // Initialise the application (async → sync).
    let mut app = pollster::block_on(App::new(window.clone(), &config))?;
    let token = app.cancel_token();

    // Run the winit event loop; one tick per redraw.
    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                // Forward events to the app; handle unconsumed window events.
                if !app.handle_event(&window, &event) {
                    match event {
                        WindowEvent::CloseRequested => token.cancel(),
                        WindowEvent::KeyboardInput { event, .. }
                            if event.state == ElementState::Pressed =>
                        {
                            match event.physical_key {
                                PhysicalKey::Code(KeyCode::Escape) => token.cancel(),
                                PhysicalKey::Code(KeyCode::F1) => app.toggle_hud(),
                                _ => {}
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            if !app.advance() {
                                elwt.exit();
                                return;
                            }

                            match app.render(&window) {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => {
                                    log::warn!("Surface lost; reconfiguring.");
                                    app.resize(app.renderer.gfx.size);
                                }
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    log::error!("WGPU out of memory – exiting.");
                                    token.cancel();
                                    elwt.exit();
                                }
                                Err(e) => log::warn!("Frame skipped: {:?}", e),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                if token.is_cancelled() {
                    log::info!("Frame loop cancelled; exiting.");
                    elwt.exit();
                } else {
                    // Request a redraw each frame.
                    window.request_redraw();
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}
