//! Single-line terminal renderer

use std::io;

use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tokio::{
    io::{AsyncWriteExt, Stdout},
    sync::watch,
};
use tracing::{debug, info};

use super::DisplaySnapshot;
use crate::{error::DisplayError, state::AlertState, utils::shutdown::Shutdown};

const ALERT_COLOR: Color = Color::Red;

/// Redraw the status line whenever the display snapshot changes.
///
/// Returns an error if stdout cannot be written; the caller carries on
/// headless.
pub async fn terminal_display_task(
    service_name: String,
    mut display_rx: watch::Receiver<DisplaySnapshot>,
    shutdown: Shutdown,
) -> Result<(), DisplayError> {
    info!("Starting terminal display");

    let mut out = tokio::io::stdout();
    let first = display_rx.borrow_and_update().clone();
    draw(&mut out, &render_line(&service_name, &first)?).await?;

    loop {
        tokio::select! {
            biased;

            _ = shutdown.wait() => break,

            changed = display_rx.changed() => {
                if changed.is_err() {
                    debug!("Display channel closed");
                    break;
                }
                let snapshot = display_rx.borrow_and_update().clone();
                draw(&mut out, &render_line(&service_name, &snapshot)?).await?;
            }
        }
    }

    out.write_all(b"\n").await?;
    out.flush().await?;
    Ok(())
}

async fn draw(out: &mut Stdout, line: &[u8]) -> Result<(), DisplayError> {
    out.write_all(line).await?;
    out.flush().await?;
    Ok(())
}

/// Build the status line for a snapshot, including the commands that clear
/// the previous one. `AlertOn` draws the timer red, `AlertOff` draws it
/// plain, so alternating states flash.
pub fn render_line(service_name: &str, snapshot: &DisplaySnapshot) -> io::Result<Vec<u8>> {
    let mut line = Vec::new();
    queue!(
        line,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(service_name),
        Print("  "),
        SetAttribute(Attribute::Bold),
    )?;

    match snapshot.alert {
        AlertState::AlertOn => queue!(
            line,
            SetForegroundColor(ALERT_COLOR),
            Print(&snapshot.timer_text),
            ResetColor,
        )?,
        AlertState::AlertOff | AlertState::Normal => queue!(line, Print(&snapshot.timer_text))?,
    }
    queue!(line, SetAttribute(Attribute::Reset))?;

    if let Some(message) = &snapshot.status_message {
        queue!(line, Print("  "), Print(message))?;
    }

    Ok(line)
}
