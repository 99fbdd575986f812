/// Terminal front end for the SR3D software renderer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{stdout, Stdout, Write};
use std::time::{Duration, Instant};
use sr3d_core::{ObjectId, RenderConfig, Scene, SceneObject};

pub mod logging;
pub mod renderer;

pub use renderer::TerminalPresenter;

const ROTATE_STEP: f32 = 0.1;
const MOVE_STEP: f32 = 0.5;
const SCALE_STEP: f32 = 1.1;

/// Terminal rows kept for the status line
const STATUS_ROWS: u16 = 1;

/// Canvas size in pixels for a terminal of `cols` x `rows` cells
pub fn canvas_size(cols: u16, rows: u16) -> (usize, usize) {
    let image_rows = rows.saturating_sub(STATUS_ROWS).max(1);
    (cols.max(1) as usize, image_rows as usize * 2)
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    object: ObjectId,
    presenter: TerminalPresenter<Stdout>,
    running: bool,
    spin: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(object: SceneObject) -> anyhow::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let (width, height) = canvas_size(cols, rows);

        let mut scene = Scene::new(RenderConfig::new(width, height))?;
        let object = scene.add_object(object);

        Ok(Self {
            scene,
            object,
            presenter: TerminalPresenter::new(stdout(), STATUS_ROWS),
            running: true,
            spin: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        log::info!("terminal renderer started");

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;
        log::info!("terminal renderer stopped");

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            self.update()?;
            self.render()?;

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

    fn handle_event(&mut self, event: Event) -> anyhow::Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => self.handle_key(code)?,
            Event::Resize(cols, rows) => {
                let (width, height) = canvas_size(cols, rows);
                self.scene.resize(width, height)?;
                execute!(stdout(), terminal::Clear(ClearType::All))?;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> anyhow::Result<()> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('f') => {
                let mode = self.scene.mode().toggled();
                self.scene.set_mode(mode);
            }
            KeyCode::Char(' ') => {
                self.spin = !self.spin;
            }
            KeyCode::Char('i') => self.scene.camera_mut().move_by(0.0, 0.0, MOVE_STEP),
            KeyCode::Char('k') => self.scene.camera_mut().move_by(0.0, 0.0, -MOVE_STEP),
            KeyCode::Char('j') => self.scene.camera_mut().move_by(-MOVE_STEP, 0.0, 0.0),
            KeyCode::Char('l') => self.scene.camera_mut().move_by(MOVE_STEP, 0.0, 0.0),
            KeyCode::Char('u') => self.scene.camera_mut().move_by(0.0, MOVE_STEP, 0.0),
            KeyCode::Char('o') => self.scene.camera_mut().move_by(0.0, -MOVE_STEP, 0.0),
            KeyCode::Char(',') => self.scene.camera_mut().rotate_by(0.0, -ROTATE_STEP, 0.0),
            KeyCode::Char('.') => self.scene.camera_mut().rotate_by(0.0, ROTATE_STEP, 0.0),
            code => {
                let object = self.scene.object_mut(self.object)?;
                match code {
                    KeyCode::Char('w') | KeyCode::Up => object.rotate_by(ROTATE_STEP, 0.0, 0.0),
                    KeyCode::Char('s') | KeyCode::Down => object.rotate_by(-ROTATE_STEP, 0.0, 0.0),
                    KeyCode::Char('a') | KeyCode::Left => object.rotate_by(0.0, -ROTATE_STEP, 0.0),
                    KeyCode::Char('d') | KeyCode::Right => object.rotate_by(0.0, ROTATE_STEP, 0.0),
                    KeyCode::Char('e') => object.rotate_by(0.0, 0.0, ROTATE_STEP),
                    KeyCode::Char('r') => object.rotate_by(0.0, 0.0, -ROTATE_STEP),
                    KeyCode::Char('+') | KeyCode::Char('=') => object.scale_by(SCALE_STEP),
                    KeyCode::Char('-') => object.scale_by(1.0 / SCALE_STEP),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn update(&mut self) -> anyhow::Result<()> {
        // Continuous slow rotation for demo effect
        if self.spin {
            self.scene
                .object_mut(self.object)?
                .rotate_by(0.01, 0.015, 0.0);
        }
        Ok(())
    }

    fn render(&mut self) -> anyhow::Result<()> {
        self.scene.present(&mut self.presenter)?;

        let stats = self.scene.last_stats();
        let out = self.presenter.writer_mut();
        queue!(
            out,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "SR3D | FPS: {:.1} | {:?} | {} drawn, {} backfaces, {} clipped | WASD/ER rotate IJKLUO,. camera +/- scale F mode Space spin Q quit",
                self.fps,
                self.scene.mode(),
                stats.drawn,
                stats.backfaces,
                stats.clipped_away,
            )),
            ResetColor
        )?;
        out.flush()?;
        Ok(())
    }
}
