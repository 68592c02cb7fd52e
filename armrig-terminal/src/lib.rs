/// Terminal front end for the arm rig: input, frame loop and picking
use armrig_core::{
    load_indexed, App, IndexedMesh, InputOutcome, Key, KeyAction, KeyInput, MeshLibrary, PartSpec,
};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{debug, error, info};
use std::io::{self, stdout, Write};
use std::path::Path;
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

const CONTROLS: &str =
    "c=camera b=base t=top 1/2=arms p=pen  arrows=edit (shift: pen twist)  s=launch  click=pick  q=quit";

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    app: App,
    library: MeshLibrary,
    renderer: AsciiRenderer,
    frame_time: Duration,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// `library` must hold every drawable attached to the rig in `app`
    pub fn new(app: App, library: MeshLibrary, target_fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            app,
            library,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            frame_time: Duration::from_secs(1) / target_fps.max(1),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;

        let result = self.main_loop();
        let restored = restore_terminal(&mut stdout(), terminal::disable_raw_mode);

        result.and(restored)
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let mut previous = Instant::now();

        while self.running {
            let frame_start = Instant::now();
            let dt = frame_start.duration_since(previous).as_secs_f32();
            previous = frame_start;

            // Handle every pending event before the frame
            while event::poll(Duration::ZERO)? {
                self.handle_event(event::read()?);
            }
            if !self.running {
                break;
            }

            self.app.update(dt);
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("Leaving frame loop");
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                let Some(input) = key_input(&key) else {
                    return;
                };
                if self.app.handle_key(&input) == InputOutcome::Quit {
                    self.running = false;
                }
            }
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => {
                // The id buffer still holds the last rendered frame
                let value = self.renderer.pick(column as usize, row as usize);
                self.app.pick(value);
            }
            Event::Resize(width, height) => {
                debug!("Terminal resized to {}x{}", width, height);
                self.renderer.resize(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        // Minimized or collapsed terminal
        if self.renderer.is_empty() {
            return Ok(());
        }
        self.renderer.clear();

        let camera = self.app.camera(self.renderer.aspect());
        let view_projection = camera.view_projection();
        self.renderer.render_guides(self.app.guides(), &view_projection);
        for item in self.app.render_items() {
            if let Some(mesh) = self.library.get(item.drawable.handle) {
                self.renderer.render_mesh(
                    mesh,
                    &item.world,
                    &view_projection,
                    item.selected,
                    item.pick_id,
                );
            }
        }

        // Output to terminal
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let status = format!(
            "armrig | FPS: {:.1} | selected: {} | {}",
            self.fps,
            self.app.selection.current(),
            self.app.message()
        );
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;
        if self.renderer.height() > 1 {
            queue!(
                stdout,
                cursor::MoveTo(0, (self.renderer.height() - 1) as u16),
                SetForegroundColor(Color::DarkGrey),
                Print(CONTROLS),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }
}

/// Leave the alternate screen and raw mode.
///
/// Raw mode is released even when writing the escape sequences fails, so a
/// broken stdout never leaves the shell unusable.
fn restore_terminal<W: Write>(
    out: &mut W,
    disable_raw_mode: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    let screen = execute!(
        out,
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show
    );
    let raw = disable_raw_mode();
    screen.and(raw)
}

/// `env_logger` default filter for the `-v` count and `--quiet` flag
pub fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Logger honoring `RUST_LOG`, with explicit `-v`/`--quiet` flags taking over
pub fn logger(verbose: u8, quiet: bool) -> env_logger::Builder {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose > 0 || quiet {
        builder.parse_filters(log_filter(verbose, quiet));
    }
    builder
}

/// Mesh for one rig part: the OBJ asset when a directory is given, else a box.
///
/// A mesh that fails to load is logged and yields `None`; no partial mesh is
/// ever returned.
pub fn load_part_mesh(spec: &PartSpec, assets: Option<&Path>) -> Option<IndexedMesh> {
    let Some(dir) = assets else {
        let [width, height, depth] = spec.fallback_size;
        return Some(IndexedMesh::cuboid(width, height, depth));
    };

    let path = dir.join(spec.mesh_file);
    match load_indexed(&path) {
        Ok(mesh) => Some(mesh),
        Err(e) => {
            error!("Skipping {}: {}", spec.part, e);
            None
        }
    }
}

/// Load every rig part's mesh and attach the ones that loaded
pub fn attach_meshes(app: &mut App, assets: Option<&Path>) -> MeshLibrary {
    let mut library = MeshLibrary::new();
    for spec in app.rig.specs().to_vec() {
        if let Some(mesh) = load_part_mesh(&spec, assets) {
            let drawable = library.insert(mesh);
            app.rig.attach_drawable(spec.part, drawable);
        }
    }
    info!("Loaded {} drawables", library.len());
    library
}

/// Translate a crossterm key event into a core key input
pub fn key_input(event: &KeyEvent) -> Option<KeyInput> {
    let key = match event.code {
        // Raw mode swallows SIGINT, so Ctrl+C quits like Esc
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Key::Escape,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Esc => Key::Escape,
        _ => return None,
    };
    let action = match event.kind {
        KeyEventKind::Press => KeyAction::Press,
        KeyEventKind::Repeat => KeyAction::Repeat,
        KeyEventKind::Release => KeyAction::Release,
    };

    Some(KeyInput {
        key,
        action,
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use armrig_core::{Part, Settings};
    use std::cell::Cell;
    use std::fs;

    const TRIANGLE_OBJ: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 1/1/1 2/1/1 3/1/1
";

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_restore_releases_raw_mode_after_write_failure() {
        let released = Cell::new(false);
        let result = restore_terminal(&mut BrokenPipe, || {
            released.set(true);
            Ok(())
        });
        assert!(released.get());
        assert!(result.is_err());

        let mut out = Vec::new();
        assert!(restore_terminal(&mut out, || Ok(())).is_ok());
        assert!(!out.is_empty());
    }

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(0, false), "warn");
        assert_eq!(log_filter(0, true), "error");
        assert_eq!(log_filter(1, false), "info");
        assert_eq!(log_filter(2, true), "debug");
        assert_eq!(log_filter(7, false), "trace");
    }

    #[test]
    fn test_verbose_flag_enables_info() {
        use log::{Level, LevelFilter, Log, Metadata};

        let info = Metadata::builder().level(Level::Info).target("armrig").build();
        let verbose = logger(1, false).build();
        assert!(verbose.enabled(&info));
        assert!(verbose.filter() >= LevelFilter::Info);

        let quiet = logger(0, true).build();
        assert!(!quiet.enabled(&info));
        assert_eq!(quiet.filter(), LevelFilter::Error);
    }

    #[test]
    fn test_boxes_without_assets() {
        let mut app = App::new(Settings::default()).unwrap();
        let library = attach_meshes(&mut app, None);
        assert_eq!(library.len(), Part::ALL.len());
    }

    #[test]
    fn test_failed_meshes_are_left_out() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Top.obj"), TRIANGLE_OBJ).unwrap();
        // A quad face would only half load; the whole mesh is rejected
        let quad = TRIANGLE_OBJ.replace("f 1/1/1 2/1/1 3/1/1", "v 1.0 1.0 0.0\nf 1/1/1 2/1/1 4/1/1 3/1/1");
        fs::write(dir.path().join("Arm1.obj"), quad).unwrap();

        let mut app = App::new(Settings::default()).unwrap();
        let top = app.rig.specs()[1];
        let arm1 = app.rig.specs()[2];
        assert_eq!(top.part, Part::Top);
        assert_eq!(arm1.part, Part::Arm1);
        assert_eq!(load_part_mesh(&top, Some(dir.path())).map(|m| m.index_count()), Some(3));
        assert!(load_part_mesh(&arm1, Some(dir.path())).is_none());

        // Every other part's file is missing
        let library = attach_meshes(&mut app, Some(dir.path()));
        assert_eq!(library.len(), 1);
        let items = app.render_items();
        assert_eq!(items.len(), 1);
        let top_pick = app.rig.graph.node(app.rig.id(Part::Top)).pick_id;
        assert_eq!(items[0].pick_id, top_pick);
    }

    #[test]
    fn test_shift_arrow() {
        let event = KeyEvent::new_with_kind(KeyCode::Left, KeyModifiers::SHIFT, KeyEventKind::Press);
        assert_eq!(key_input(&event), Some(KeyInput::press(Key::Left).with_shift()));
    }

    #[test]
    fn test_release_and_ctrl_c() {
        let event =
            KeyEvent::new_with_kind(KeyCode::Char('p'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(key_input(&event).map(|input| input.action), Some(KeyAction::Release));

        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_input(&event).map(|input| input.key), Some(Key::Escape));

        let event = KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE);
        assert_eq!(key_input(&event), None);
    }
}
