//! Into Stellar entry point
//!
//! The browser build is driven from `platform::web`. Natively this runs a
//! line-driven terminal game: type moves (wasd), `p` pause, `r` restart,
//! `f` to save progress, `q` to save and quit. Real time between lines
//! drives the enemies.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Into Stellar (native) starting...");

    if let Err(e) = terminal::run() {
        log::error!("{}", e);
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::io::{self, BufRead, Write};
    use std::time::Instant;

    use into_stellar::platform::{parse_line, text};
    use into_stellar::session::SessionError;
    use into_stellar::sim::GameStats;
    use into_stellar::{Command, LogReporter, Session, Settings};

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let settings = Settings::load();
        let mut session = Session::new(&settings, GameStats::default(), LogReporter)?;

        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut last = Instant::now();

        draw(&mut session, &mut stdout)?;
        for line in stdin.lock().lines() {
            let line = line?;
            let elapsed = last.elapsed().as_millis().min(u32::MAX as u128) as u32;
            last = Instant::now();

            // Enemies moved while the player was typing
            session.apply(Command::Elapsed(elapsed))?;

            let trimmed = line.trim();
            if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
                flush(&mut session);
                break;
            }
            if trimmed.eq_ignore_ascii_case("f") {
                flush(&mut session);
            } else {
                for input in parse_line(trimmed) {
                    session.apply(Command::Input(input))?;
                }
            }

            draw(&mut session, &mut stdout)?;
        }

        log::info!("Final score {}", session.stats().score);
        Ok(())
    }

    fn flush(session: &mut Session<LogReporter>) {
        match session.apply(Command::FlushProgress) {
            Ok(()) => {}
            Err(SessionError::Report(e)) => log::warn!("Progress not saved: {}", e),
            Err(e) => log::error!("{}", e),
        }
    }

    fn draw(session: &mut Session<LogReporter>, out: &mut impl Write) -> io::Result<()> {
        for event in session.take_events() {
            let (title, description) = event.notice();
            if description.is_empty() {
                writeln!(out, "** {title}")?;
            } else {
                writeln!(out, "** {title} {description}")?;
            }
        }
        write!(out, "{}", text::render(&session.snapshot()))?;
        write!(out, "> ")?;
        out.flush()
    }
}
