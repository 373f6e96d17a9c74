use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use crossterm::event::{
    poll as event_poll, read as event_read, Event as CrosstermEvent, KeyEvent, MouseEvent,
};
use dirview::app::{FileBrowser, ViewMode};
use dirview::config::Config;
use dirview::services::async_bridge::AsyncBridge;
use dirview::services::listing::{HttpListingSource, ListingClient};
use dirview::services::terminal_modes::{self, TerminalModes};
use dirview::services::{log_dirs, tracing_setup};
use dirview::view::theme::Theme;
use dirview::view::ui::FileBrowserRenderer;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Browse a remote directory tree in the terminal
#[derive(Parser, Debug)]
#[command(name = "dirview")]
#[command(about = "Browse a remote directory-listing API as a tree or a folder view", long_about = None)]
#[command(version)]
struct Args {
    /// Path to browse, sent to the server as is
    #[arg(value_name = "PATH", default_value = ".")]
    path: String,

    /// Base URL of the listing server (overrides the config file)
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// View shown on startup (overrides the config file)
    #[arg(long, value_name = "tree|file", value_parser = parse_view_mode)]
    view: Option<ViewMode>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file (default: per-process file in the state directory)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the JSON schema of the configuration file and exit
    #[arg(long)]
    dump_schema: bool,

    /// Print the config and log locations and exit
    #[arg(long)]
    show_paths: bool,
}

fn parse_view_mode(value: &str) -> Result<ViewMode, String> {
    match value.to_ascii_lowercase().as_str() {
        "tree" => Ok(ViewMode::Tree),
        "file" => Ok(ViewMode::File),
        other => Err(format!("unknown view '{}', expected 'tree' or 'file'", other)),
    }
}

/// Config file (explicit or per-user) with command-line overrides applied
fn load_config(args: &Args) -> AnyhowResult<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_or_default().context("Failed to load user config")?,
    };

    if let Some(server) = &args.server {
        config.server.base_url = server.clone();
    }
    if let Some(view) = args.view {
        config.browser.initial_view = view;
    }
    Ok(config)
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    if args.show_paths {
        log_dirs::print_all_paths();
        return Ok(());
    }

    let config = load_config(&args)?;

    if args.dump_config {
        let json =
            serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        println!("{}", json);
        return Ok(());
    }

    if args.dump_schema {
        let json = serde_json::to_string_pretty(&Config::json_schema())
            .context("Failed to serialize config schema")?;
        println!("{}", json);
        return Ok(());
    }

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(log_dirs::main_log_path);
    if !tracing_setup::init_global(&log_file) {
        eprintln!("Warning: could not open log file {}", log_file.display());
    }
    log_dirs::cleanup_stale_logs();
    tracing::info!("dirview starting, browsing {}", args.path);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("dirview-listing")
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;

    let bridge = AsyncBridge::new();
    let source = HttpListingSource::new(&config.server.base_url, config.server.timeout());
    tracing::info!("Listing endpoint: {}", source.url());
    let client = ListingClient::new(runtime.handle().clone(), Arc::new(source), bridge.sender());
    let mut browser = FileBrowser::new(args.path.clone(), config.browser.clone(), Box::new(client));

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        terminal_modes::emergency_cleanup();
        original_hook(panic);
    }));

    let mut terminal_modes = TerminalModes::enable().context("Failed to set up terminal")?;
    if !terminal_modes.mouse_capture_enabled() {
        tracing::info!("Mouse capture unavailable, keyboard only");
    }

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;
    let size = terminal.size()?;
    tracing::info!("Terminal size: {}x{}", size.width, size.height);

    browser.mount();
    let result = run_event_loop(&mut browser, &bridge, &mut terminal);

    terminal_modes.undo();
    // Blocking requests still in flight are abandoned
    runtime.shutdown_timeout(Duration::from_millis(100));
    tracing::info!("dirview exiting");

    result.context("Event loop returned an error")
}

/// Main event loop
///
/// Every state change happens here: completed listings drained from the
/// bridge, then one terminal event. Rendering is throttled to one frame per
/// `FRAME_DURATION`.
fn run_event_loop(
    browser: &mut FileBrowser,
    bridge: &AsyncBridge,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> AnyhowResult<()> {
    const FRAME_DURATION: Duration = Duration::from_millis(16); // 60fps
    let theme = Theme::default();
    let mut last_render = Instant::now();
    let mut needs_render = true;

    loop {
        for message in bridge.try_recv_all() {
            browser.handle_async_message(message);
            needs_render = true;
        }

        if browser.should_quit() {
            break;
        }

        if needs_render && last_render.elapsed() >= FRAME_DURATION {
            terminal.draw(|frame| {
                let area = frame.area();
                FileBrowserRenderer::render(frame, area, browser, &theme);
            })?;
            last_render = Instant::now();
            needs_render = false;
        }

        let timeout = if needs_render {
            FRAME_DURATION.saturating_sub(last_render.elapsed())
        } else {
            Duration::from_millis(50)
        };
        if !event_poll(timeout)? {
            continue;
        }

        match event_read()? {
            CrosstermEvent::Key(key_event) => {
                handle_key_event(browser, key_event);
                needs_render = true;
            }
            CrosstermEvent::Mouse(mouse_event) => {
                if handle_mouse_event(browser, mouse_event) {
                    needs_render = true;
                }
            }
            CrosstermEvent::Resize(width, height) => {
                tracing::debug!("Terminal resized to {}x{}", width, height);
                needs_render = true;
            }
            _ => {}
        }
    }

    Ok(())
}

fn handle_key_event(browser: &mut FileBrowser, key_event: KeyEvent) {
    tracing::trace!(
        "Key event received: code={:?}, modifiers={:?}, kind={:?}",
        key_event.code,
        key_event.modifiers,
        key_event.kind
    );
    browser.handle_key(key_event);
}

/// Returns true if a re-render is needed
fn handle_mouse_event(browser: &mut FileBrowser, mouse_event: MouseEvent) -> bool {
    tracing::trace!(
        "Mouse event received: kind={:?}, column={}, row={}",
        mouse_event.kind,
        mouse_event.column,
        mouse_event.row
    );
    browser.handle_mouse(mouse_event)
}
