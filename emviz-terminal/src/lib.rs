//! Terminal front end for the waveform driver

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use emviz_core::{
    Camera, Driver, SystemTimeSource, Visualization, VisualizationConfig, Waveform,
    WaveformParameters, WaveformSample,
};
use serde::Serialize;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod logging;
pub mod renderer;
pub mod scene;

pub use logging::LogGate;
pub use renderer::AsciiRenderer;
pub use scene::Scene;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

/// Rows reserved at the top for the title and readouts.
const OVERLAY_ROWS: u16 = 4;

/// Live ASCII view of one visualization card at a time
pub struct TerminalApp {
    driver: Driver<SystemTimeSource>,
    config: VisualizationConfig,
    scene: Scene,
    camera: Camera,
    renderer: AsciiRenderer,
    log_gate: Option<LogGate>,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(visualization: Visualization, config: VisualizationConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let rows = height.saturating_sub(OVERLAY_ROWS).max(1);
        let scene = Scene::new(visualization);

        Ok(Self {
            driver: Driver::new(
                visualization,
                config.parameters(visualization),
                SystemTimeSource::new(),
            ),
            camera: scene_camera(&scene, width, rows),
            renderer: AsciiRenderer::new(width as usize, rows as usize),
            log_gate: None,
            config,
            scene,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    /// Buffer log output through `gate` while the live view is up.
    pub fn with_log_gate(mut self, gate: LogGate) -> Self {
        self.log_gate = Some(gate);
        self
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        if let Some(gate) = &self.log_gate {
            gate.hold();
        }

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;
        if let Some(gate) = &self.log_gate {
            gate.release()?;
        }

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            self.render()?;

            // Sampling is by elapsed time, so a late frame only drops a picture
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                KeyCode::Char(' ') => self.driver.clock_mut().toggle_pause(),
                KeyCode::Tab => self.show(self.driver.visualization().next()),
                _ => {}
            },
            Event::Resize(width, height) => {
                let rows = height.saturating_sub(OVERLAY_ROWS).max(1);
                self.renderer.resize(width as usize, rows as usize);
                self.camera = scene_camera(&self.scene, width, rows);
                execute!(stdout(), terminal::Clear(terminal::ClearType::All))?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Remount on another card; its clock starts again from zero.
    fn show(&mut self, visualization: Visualization) {
        self.driver
            .remount(visualization, self.config.parameters(visualization));
        self.scene = Scene::new(visualization);
        self.camera = scene_camera(
            &self.scene,
            self.renderer.width() as u16,
            self.renderer.height() as u16,
        );
    }

    fn render(&mut self) -> io::Result<()> {
        let sample = self.driver.sample();

        self.renderer.clear();
        self.renderer.render(&self.scene.frame(&sample), &self.camera);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, OVERLAY_ROWS))?;
        self.renderer.draw(&mut stdout)?;

        let paused = if self.driver.clock().is_paused() {
            " [paused]"
        } else {
            ""
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "{}{} | t = {:.2} s | FPS: {:.1} | Space=Pause Tab=Next Q=Quit",
                self.driver.visualization().title(),
                paused,
                sample.time,
                self.fps
            )),
            ResetColor
        )?;
        for (row, line) in (1..OVERLAY_ROWS).zip(self.driver.readouts(&sample)) {
            queue!(
                stdout,
                cursor::MoveTo(0, row),
                terminal::Clear(terminal::ClearType::CurrentLine),
                Print(line)
            )?;
        }

        stdout.flush()?;
        Ok(())
    }
}

fn scene_camera(scene: &Scene, columns: u16, rows: u16) -> Camera {
    Camera::for_cells(columns as u32, rows as u32, CELL_ASPECT)
        .looking_from(scene.camera_position())
        .with_mode(scene.projection_mode())
}

#[derive(Serialize)]
struct DumpLine<'a> {
    visualization: &'a str,
    sample: &'a WaveformSample,
}

/// Write `frames` samples at `t = k / fps`, one JSON object per line.
pub fn dump_samples<W: Write>(
    out: &mut W,
    visualization: Visualization,
    params: &WaveformParameters,
    frames: usize,
    fps: f64,
) -> io::Result<()> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("frame rate must be positive, got {fps}"),
        ));
    }

    for k in 0..frames {
        let sample = params.sample(k as f64 / fps);
        let line = DumpLine {
            visualization: visualization.name(),
            sample: &sample,
        };
        serde_json::to_writer(&mut *out, &line)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}
