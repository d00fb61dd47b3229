//! ## Printing Module
//!
//! This module is only here to make logging in the terminal easier to read.
//! Every level has its own colour and its own on/off switch in [config].
//! It also provides table prints of a node's order matrix and of the peer liveness table.
use crate::config;
use crate::world_view::{OrderStatus, StatusMessage};
use ansi_term::Colour::{self, Green, Purple, Red, Yellow, Cyan};
use prettytable::{color, format, Attr, Cell, Row, Table};
use std::sync::Mutex;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;


fn enabled(flag: &Mutex<bool>) -> bool {
    *flag.lock().unwrap_or_else(|e| e.into_inner())
}

/// Prints an error message in red to the terminal.
///
/// If `PRINT_ERR_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[ERROR\]:   {}", msg
///
/// ## Example
/// ```
/// use elevatorpeer::print;
///
/// print::err("Something went wrong!".to_string());
/// ```
pub fn err(msg: String) {
    if enabled(&config::PRINT_ERR_ON) {
        println!("{}{}\n", Red.paint("[ERROR]:   "), Red.paint(msg));
    }
}

/// Prints a warning message in yellow to the terminal.
///
/// If `PRINT_WARN_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[WARNING\]: {}", msg
pub fn warn(msg: String) {
    if enabled(&config::PRINT_WARN_ON) {
        println!("{}{}\n", Yellow.paint("[WARNING]: "), Yellow.paint(msg));
    }
}

/// Prints an OK message in green to the terminal.
///
/// If `PRINT_OK_ON` is `false`, the message will not be printed.
pub fn ok(msg: String) {
    if enabled(&config::PRINT_OK_ON) {
        println!("{}{}\n", Green.paint("[OK]:      "), Green.paint(msg));
    }
}

/// Prints an info message in light blue to the terminal.
///
/// If `PRINT_INFO_ON` is `false`, the message will not be printed.
pub fn info(msg: String) {
    if enabled(&config::PRINT_INFO_ON) {
        println!("{}{}\n", Colour::RGB(102, 178, 255).paint("[INFO]:    "), Colour::RGB(102, 178, 255).paint(msg));
    }
}

/// Prints an error for something that should not be possible, in rainbow colours.
///
/// Printed regardless of the switches.
pub fn cosmic_err(fun: String) {
    print!("{}", Colour::Red.paint("[ERROR]: "));

    let colors = [
        Colour::Red,
        Colour::Yellow,
        Colour::Green,
        Colour::Cyan,
        Colour::Blue,
        Colour::Purple,
    ];

    let message = format!("Cosmic rays flipped a bit! IN: {}", fun);
    for (i, c) in message.chars().enumerate() {
        let color = colors[i % colors.len()];
        print!("{}", color.paint(c.to_string()));
    }

    println!();
}

/// Pads the input text to a fixed display width using spaces.
///
/// Accounts for characters that take more than one column, so terminal tables stay aligned.
fn pad_text(text: &str, width: usize) -> String {
    let visible_width = UnicodeWidthStr::width(text);
    let padding = width.saturating_sub(visible_width);
    format!("{}{}", text, " ".repeat(padding))
}

/// Green "alive" or red "dead", padded to `width`
fn colored_alive_label(alive: bool, width: usize) -> String {
    if alive {
        Green.paint(pad_text("alive", width)).to_string()
    } else {
        Red.paint(pad_text("dead", width)).to_string()
    }
}

fn status_cell(status: OrderStatus) -> Cell {
    match status {
        OrderStatus::Active => Cell::new("X").with_style(Attr::ForegroundColor(color::GREEN)),
        OrderStatus::Pending => Cell::new("P").with_style(Attr::ForegroundColor(color::YELLOW)),
        OrderStatus::Inactive => Cell::new(" "),
    }
}

/// Builds the order matrix table of one status message.
///
/// One row per floor with the hall up, hall down and cab slots. `X` is Active, `P` is Pending,
/// blank is Inactive.
pub fn order_matrix_table(msg: &StatusMessage) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);

    table.set_titles(Row::new(vec![
        Cell::new("").with_style(Attr::Bold),
        Cell::new("Up").with_style(Attr::Bold),
        Cell::new("Dn").with_style(Attr::Bold),
        Cell::new("Cab").with_style(Attr::Bold),
    ]));

    for (floor, (hall, cab)) in msg.hall_orders.iter().zip(msg.cab_orders.iter()).enumerate() {
        table.add_row(Row::new(vec![
            Cell::new(&format!("F{}", floor)),
            status_cell(hall[0]),
            status_cell(hall[1]),
            status_cell(*cab),
        ]));
    }
    table
}

/// Prints the order matrix of a peer, with its id and message number.
///
/// If `PRINT_WV_ON` is `false`, nothing is printed.
pub fn order_matrix(msg: &StatusMessage) {
    if !enabled(&config::PRINT_WV_ON) {
        return;
    }
    println!("{}", Purple.bold().paint(format!("Orders of node {}", msg.sender_id)));
    order_matrix_table(msg).printstd();
    println!("msgID: {}, floor: {}, {}\n", msg.msg_id, msg.floor, msg.behaviour.as_str());
}

/// Prints the liveness table, one line per peer ever heard from.
///
/// If `PRINT_WV_ON` is `false`, nothing is printed.
pub fn peer_table(rows: &[(String, bool, Duration)]) {
    if !enabled(&config::PRINT_WV_ON) {
        return;
    }
    println!("{}", Cyan.bold().paint("PEERS"));
    for (id, alive, since) in rows {
        println!(
            "  {} {} {:>6} ms",
            pad_text(id, 8),
            colored_alive_label(*alive, 6),
            since.as_millis()
        );
    }
    println!();
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_view::WorldView;

    #[test]
    fn matrix_marks_pending_and_active() {
        let mut wv = WorldView::new("15657".to_string(), 0);
        wv.hall_orders[1][0] = OrderStatus::Active;
        wv.cab_orders[3] = OrderStatus::Pending;
        let table = order_matrix_table(&wv.next_snapshot());

        assert_eq!(table.len(), 4);
        let rendered = table.to_string();
        assert!(rendered.contains('X'));
        assert!(rendered.contains('P'));
        assert!(rendered.contains("F3"));
    }

    #[test]
    fn padding_counts_display_width() {
        assert_eq!(pad_text("ab", 5), "ab   ");
        assert_eq!(pad_text("abcdef", 3), "abcdef");
    }
}
