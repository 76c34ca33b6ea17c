use crate::tui::app::App;
use crate::tui::menu::Selector;
use depth_ladder::{RenderRow, Side};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};
use std::fmt::Display;

const PRICE_WIDTH: u16 = 16;
const QUANTITY_WIDTH: u16 = 16;
const CELL_BG: Color = Color::Rgb(6, 6, 6);

/// Text and bar colours for one side. The bar is the text colour at 20% over the cell
/// background.
struct Palette {
    text: Color,
    bar: Color,
}

fn palette(side: Side) -> Palette {
    match side {
        Side::Bid => Palette {
            text: Color::Rgb(13, 230, 49),
            bar: Color::Rgb(7, 51, 15),
        },
        Side::Ask => Palette {
            text: Color::Rgb(230, 31, 7),
            bar: Color::Rgb(51, 11, 6),
        },
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(20),
            Constraint::Length(3),
        ])
        .split(f.size());

    draw_header(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(PRICE_WIDTH + QUANTITY_WIDTH + 5),
            Constraint::Min(30),
        ])
        .split(chunks[1]);

    draw_ladder(f, main_chunks[0], app);
    draw_side_panel(f, main_chunks[1], app);
    draw_footer(f, chunks[2]);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let header_text = vec![
        Span::styled(
            "Depth Ladder | ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} ", app.pair()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("| Step: {} ", app.steps.current()),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!(
                "| Source: {} every {}ms ",
                app.source_name(),
                app.refresh_interval.as_millis()
            ),
            Style::default().fg(Color::Gray),
        ),
        if app.paused {
            Span::styled(
                "| PAUSED",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(
                "| RUNNING",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
        },
    ];

    let header = Paragraph::new(Line::from(header_text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .alignment(Alignment::Center);

    f.render_widget(header, area);
}

fn draw_ladder(f: &mut Frame, area: Rect, app: &App) {
    let table_height = app.params().rows as u16 + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(table_height),
            Constraint::Length(3),
            Constraint::Length(table_height),
            Constraint::Min(0),
        ])
        .split(area);

    // Best ask sits at the bottom of its table, next to the mid-price.
    let asks: Vec<&RenderRow> = app.view.asks.iter().rev().collect();
    let bids: Vec<&RenderRow> = app.view.bids.iter().collect();

    f.render_widget(side_table(&asks, Side::Ask, "Asks"), chunks[0]);

    let mid = app.view.mid_price.as_deref().unwrap_or("--");
    let mid_price = Paragraph::new(Line::from(Span::styled(
        mid.to_string(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL).title(" Mid "))
    .alignment(Alignment::Center);
    f.render_widget(mid_price, chunks[1]);

    f.render_widget(side_table(&bids, Side::Bid, "Bids"), chunks[2]);
}

fn side_table<'a>(rows: &[&'a RenderRow], side: Side, title: &'a str) -> Table<'a> {
    let colors = palette(side);
    let width = QUANTITY_WIDTH as usize;

    let rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            let price = Cell::from(format!("{:>w$}", row.price, w = PRICE_WIDTH as usize))
                .style(Style::default().fg(colors.text).bg(CELL_BG));

            let fill = if row.style.is_max {
                100.0
            } else {
                row.style.fill_percent
            };
            let (plain, filled) = fill_bar(&row.quantity, width, fill);
            let mut bar_style = Style::default().fg(Color::White).bg(colors.bar);
            if row.style.is_max {
                bar_style = bar_style.add_modifier(Modifier::SLOW_BLINK | Modifier::BOLD);
            }
            let quantity = Cell::from(Line::from(vec![
                Span::styled(plain, Style::default().fg(Color::White).bg(CELL_BG)),
                Span::styled(filled, bar_style),
            ]));

            Row::new(vec![price, quantity])
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Length(PRICE_WIDTH),
            Constraint::Length(QUANTITY_WIDTH),
        ],
    )
    .block(
        Block::default()
            .title(format!(" {title} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.text)),
    )
}

/// Right-aligns `text` in `width` columns and splits it where a bar anchored on the right
/// edge and covering `fill_percent` of the width begins.
pub fn fill_bar(text: &str, width: usize, fill_percent: f64) -> (String, String) {
    let padded = format!("{text:>width$}");
    let filled = ((width as f64) * fill_percent / 100.0).round() as usize;
    let split = padded.len().saturating_sub(filled.min(width));
    let (plain, bar) = padded.split_at(split);
    (plain.to_string(), bar.to_string())
}

fn draw_side_panel(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Min(5),
        ])
        .split(area);

    draw_menus(f, chunks[0], app);
    draw_stats(f, chunks[1], app);
    draw_events(f, chunks[2], app);
}

fn menu_line<T: Display>(menu: &Selector<T>, key: char) -> Vec<Line<'static>> {
    let mut options = vec![];
    for (i, option) in menu.options().iter().enumerate() {
        let style = if i == menu.index() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        options.push(Span::styled(format!(" {option} "), style));
        options.push(Span::raw(" "));
    }

    vec![
        Line::from(Span::styled(
            format!("{} [{}]", menu.title(), key),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(options),
    ]
}

fn draw_menus(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = menu_line(&app.steps, 's');
    lines.extend(menu_line(&app.pairs, 'p'));
    lines.extend(menu_line(&app.quantity_precision, 'v'));
    lines.extend(menu_line(&app.price_precision, 'd'));

    let menus = Paragraph::new(lines)
        .block(Block::default().title(" Settings ").borders(Borders::ALL))
        .wrap(Wrap { trim: false });

    f.render_widget(menus, area);
}

fn draw_stats(f: &mut Frame, area: Rect, app: &App) {
    let stats_text = match &app.stats {
        Some(stats) => vec![
            Line::from(format!(
                "Spread: {} | Imbalance: {:.1}%",
                stats
                    .spread
                    .map(|s| s.normalize().to_string())
                    .unwrap_or_else(|| "--".to_string()),
                stats.imbalance * 100.0
            )),
            Line::from(format!(
                "Bid Vol: {:.4} | Ask Vol: {:.4}",
                stats.bid_volume, stats.ask_volume
            )),
            Line::from(format!(
                "Levels: {} bids / {} asks | Update: {}",
                stats.bid_levels, stats.ask_levels, stats.update_id
            )),
            Line::from(format!(
                "Ticks: {} ({} failed) | Fetch: {}",
                app.total_ticks,
                app.failed_ticks,
                app.last_fetch
                    .map(|d| format!("{}ms", d.as_millis()))
                    .unwrap_or_else(|| "--".to_string())
            )),
        ],
        None => vec![Line::from("Waiting for first snapshot...")],
    };

    let stats = Paragraph::new(stats_text)
        .block(Block::default().title(" Market ").borders(Borders::ALL))
        .alignment(Alignment::Left);

    f.render_widget(stats, area);
}

fn draw_events(f: &mut Frame, area: Rect, app: &App) {
    let events: Vec<ListItem> = app
        .events
        .iter()
        .map(|(msg, timestamp)| {
            let age = timestamp.elapsed().as_secs();
            let age_str = if age < 1 {
                "now".to_string()
            } else {
                format!("{age}s")
            };

            ListItem::new(format!("{age_str} │ {msg}")).style(Style::default().fg(Color::Gray))
        })
        .collect();

    let events_list =
        List::new(events).block(Block::default().title(" Events ").borders(Borders::ALL));

    f.render_widget(events_list, area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let help_text = Line::from(vec![
        Span::styled("Commands: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("s/S = Step │ p/P = Pair │ d/D = Price dp │ v/V = Qty dp │ "),
        Span::raw("r = Refresh │ Space = Pause │ Q/Esc = Quit"),
    ]);

    let footer = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}
