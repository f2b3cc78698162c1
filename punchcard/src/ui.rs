//! UI rendering for the statistics dashboard.
//!
//! Rendering is a pure function of the current [`App`] state: pages are
//! aggregated before the loop starts, so redrawing a tab never refetches.

use chrono::{Local, Utc};
use punchcard_core::format::format_duration;
use punchcard_core::stats::NameSlice;
use punchcard_core::{Period, Session};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Sparkline},
    Frame,
};

use crate::app::{App, Page};

/// Accent for totals and confirmations
const ACCENT: Color = Color::Rgb(80, 200, 120);
/// Active-session highlights
const ACTIVE_COLOR: Color = Color::Rgb(220, 180, 0);
/// Border color for stat blocks
const BORDER_STATS: Color = Color::Rgb(0, 150, 150);
/// Border color for the chart and list blocks
const BORDER_CHART: Color = Color::Rgb(80, 160, 80);
/// Dim gray for secondary text
const DIM: Color = Color::Rgb(128, 128, 128);

/// Per-slice colors for the name breakdown, in rank order.
const SLICE_COLORS: [Color; 6] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Cyan,
    Color::Magenta,
];

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: tab header, summary, page body, footer
    let chunks = Layout::vertical([
        Constraint::Length(2), // Tab header
        Constraint::Length(4), // Summary blocks
        Constraint::Min(6),    // Page content
        Constraint::Length(1), // Footer
    ])
    .split(area);

    render_tab_header(frame, app, chunks[0]);

    let page = app.active_page();
    render_summary(frame, page, chunks[1]);
    render_page_body(frame, page, chunks[2]);
    render_footer(frame, page, chunks[3]);
}

/// Render the period tabs, highlighting the active one.
fn render_tab_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, page) in app.pages.iter().enumerate() {
        let title = page.stats.period.title();
        if i == app.active_tab {
            spans.push(Span::styled(
                format!(" {title} "),
                Style::default().fg(Color::Black).bg(ACCENT).bold(),
            ));
        } else {
            spans.push(Span::styled(
                format!(" {title} "),
                Style::default().fg(DIM),
            ));
        }
        spans.push(Span::raw(" "));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(DIM)));
    frame.render_widget(header, area);
}

/// Render the three summary blocks: total duration, completed, active.
fn render_summary(frame: &mut Frame, page: &Page, area: Rect) {
    let chunks = Layout::horizontal([
        Constraint::Percentage(50),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
    ])
    .split(area);

    let stats = &page.stats;

    let total = Paragraph::new(format_duration(stats.total, 3))
        .style(Style::default().fg(ACCENT))
        .block(stat_block(" Total duration "));
    frame.render_widget(total, chunks[0]);

    let completed = Paragraph::new(stats.completed.to_string())
        .style(Style::default().fg(ACCENT))
        .block(stat_block(" Completed "));
    frame.render_widget(completed, chunks[1]);

    let active = Paragraph::new(stats.active.to_string())
        .style(Style::default().fg(ACTIVE_COLOR))
        .block(stat_block(" Active "));
    frame.render_widget(active, chunks[2]);
}

fn stat_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_STATS))
        .title(title)
}

/// Render the page-specific body: daily series chart, session list, and
/// name breakdown, depending on what the period descriptor asks for.
fn render_page_body(frame: &mut Frame, page: &Page, area: Rect) {
    let period = page.stats.period;

    if period.has_list() {
        let chunks =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(area);
        render_session_list(frame, page, chunks[0]);
        render_breakdown(frame, &page.stats.breakdown, chunks[1]);
    } else if page.stats.daily_minutes.is_some() {
        let chunks =
            Layout::vertical([Constraint::Length(8), Constraint::Min(4)]).split(area);
        render_daily_series(frame, page, chunks[0]);
        render_breakdown(frame, &page.stats.breakdown, chunks[1]);
    } else {
        render_breakdown(frame, &page.stats.breakdown, area);
    }
}

/// Render the scrollable session list for the `today`/`24hrs` pages.
fn render_session_list(frame: &mut Frame, page: &Page, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_CHART))
        .title(" Sessions ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = page
        .stats
        .sessions
        .iter()
        .skip(page.scroll)
        .take(inner.height as usize)
        .map(session_line)
        .collect();

    let list = if lines.is_empty() {
        Paragraph::new(Span::styled("no sessions in this period", Style::default().fg(DIM)))
    } else {
        Paragraph::new(lines)
    };
    frame.render_widget(list, inner);
}

fn session_line(session: &Session) -> Line<'_> {
    let start = session
        .start
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string();
    let mut spans = vec![
        Span::styled(format!("[{}] ", session.id), Style::default().fg(DIM)),
        Span::raw(session.display_name().to_string()),
        Span::styled(format!("  {start}  "), Style::default().fg(DIM)),
    ];
    match session.duration() {
        Some(duration) => spans.push(Span::styled(
            format_duration(duration, 2),
            Style::default().fg(ACCENT),
        )),
        None => spans.push(Span::styled(
            format!("running for {}", format_duration(Utc::now() - session.start, 2)),
            Style::default().fg(ACTIVE_COLOR),
        )),
    }
    Line::from(spans)
}

/// Render the daily minutes sparkline for the week/month/year pages.
fn render_daily_series(frame: &mut Frame, page: &Page, area: Rect) {
    let Some(daily) = &page.stats.daily_minutes else {
        return;
    };

    let title = format!(" Minutes per day (last {}) ", daily.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_CHART))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let data: Vec<u64> = daily.iter().map(|&m| m.round().max(0.0) as u64).collect();
    let chunks = Layout::vertical([Constraint::Min(2), Constraint::Length(1)]).split(inner);

    // The sparkline draws from the front of the slice; keep today (the last
    // bucket) visible by dropping the oldest days that do not fit.
    let visible = data.len().saturating_sub(chunks[0].width as usize);
    let sparkline = Sparkline::default()
        .data(&data[visible..])
        .style(Style::default().fg(ACCENT))
        .bar_set(symbols::bar::NINE_LEVELS);
    frame.render_widget(sparkline, chunks[0]);

    let labels = Paragraph::new(Line::from(vec![
        Span::styled("oldest", Style::default().fg(DIM)),
        Span::raw(" ".repeat((chunks[1].width as usize).saturating_sub(11))),
        Span::styled("today", Style::default().fg(DIM)),
    ]));
    frame.render_widget(labels, chunks[1]);
}

/// Render the per-name duration breakdown as proportional bars.
fn render_breakdown(frame: &mut Frame, breakdown: &[NameSlice], area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_CHART))
        .title(" Session names ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if breakdown.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "no finished sessions in this period",
                Style::default().fg(DIM),
            )),
            inner,
        );
        return;
    }

    let max_minutes = breakdown
        .iter()
        .map(|s| s.minutes)
        .fold(f64::MIN, f64::max)
        .max(1.0);
    let label_width = breakdown
        .iter()
        .map(|s| display_slice_name(s).len())
        .max()
        .unwrap_or(0);
    let bar_width = (inner.width as usize).saturating_sub(label_width + 12).max(4);

    let lines: Vec<Line> = breakdown
        .iter()
        .enumerate()
        .take(inner.height as usize)
        .map(|(i, slice)| {
            let color = SLICE_COLORS[i % SLICE_COLORS.len()];
            let filled = ((slice.minutes / max_minutes) * bar_width as f64).round() as usize;
            Line::from(vec![
                Span::styled(
                    format!("{:width$} ", display_slice_name(slice), width = label_width),
                    Style::default().fg(color),
                ),
                Span::styled("█".repeat(filled.max(1)), Style::default().fg(color)),
                Span::styled(
                    format!(" {:.0}m", slice.minutes),
                    Style::default().fg(DIM),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn display_slice_name(slice: &NameSlice) -> &str {
    if slice.name.is_empty() {
        "none"
    } else {
        &slice.name
    }
}

/// Render the key hints footer.
fn render_footer(frame: &mut Frame, page: &Page, area: Rect) {
    let scroll_hint = if page.stats.period.has_list() {
        "↑/↓ scroll · "
    } else {
        ""
    };
    let footer = Paragraph::new(Span::styled(
        format!(" ←/→ switch tabs · {scroll_hint}q or esc to quit"),
        Style::default().fg(DIM),
    ));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use chrono::Duration;
    use punchcard_core::PeriodStats;
    use ratatui::{backend::TestBackend, Terminal};

    fn sample_app() -> App {
        let now = Utc::now();
        let sessions = vec![
            Session {
                id: 1,
                name: "writing".to_string(),
                start: now - Duration::minutes(90),
                finish: Some(now - Duration::minutes(30)),
            },
            Session {
                id: 2,
                name: String::new(),
                start: now - Duration::minutes(20),
                finish: None,
            },
        ];
        let pages = Period::ALL
            .iter()
            .map(|&period| crate::app::Page {
                stats: PeriodStats::from_sessions(period, sessions.clone(), now),
                scroll: 0,
            })
            .collect();
        App::from_pages(pages, Period::All)
    }

    #[test]
    fn test_render_every_tab_without_panicking() {
        let mut app = sample_app();
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();

        for tab in 0..app.pages.len() {
            app.active_tab = tab;
            terminal.draw(|frame| render(frame, &app)).unwrap();
        }
    }

    #[test]
    fn test_render_survives_tiny_terminal() {
        let app = sample_app();
        let backend = TestBackend::new(10, 4);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
    }

    #[test]
    fn test_tab_header_shows_active_period() {
        let app = sample_app();
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer().clone();
        let content: String = buffer.content().iter().map(|c| c.symbol()).collect();
        for period in Period::ALL {
            assert!(content.contains(period.title()), "missing {period} tab");
        }
    }
}
