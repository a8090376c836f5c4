use crate::aggregate::{latest_year, BrandTotal, StackedSeries, YearlyTotal};
use crate::record::{BrandOrigin, Record};
use crate::scene::{Scene, SceneData};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph,
    },
    Frame, Terminal,
};
use std::io;

// Palette from the source charts: Asian red, Western blue
const ASIAN_COLOR: Color = Color::Red;
const WESTERN_COLOR: Color = Color::Blue;

const SCENE0_CAPTION: &str = "Western brands overtook Asian brands around 2016";
const SCENE1_CAPTION: &str = "Asian brands dominated early years, Western rising since 2010";
const SCENE2_CAPTION: &str = "Asian brands lead in top 10, with Toyota and Hyundai dominating";

fn origin_color(origin: BrandOrigin) -> Color {
    match origin {
        BrandOrigin::Asian => ASIAN_COLOR,
        BrandOrigin::Western => WESTERN_COLOR,
    }
}

/// UI controller: the immutable record set plus the active scene.
///
/// The scene value is owned here and passed by reference into the
/// render functions - it is the only mutable state in the process.
pub struct App {
    pub records: Vec<Record>,
    pub scene: Scene,
}

impl App {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            scene: Scene::default(),
        }
    }

    pub fn next_scene(&mut self) {
        self.scene = self.scene.next();
    }

    pub fn previous_scene(&mut self) {
        self.scene = self.scene.previous();
    }

    pub fn select_scene(&mut self, index: usize) {
        if let Some(scene) = Scene::select(index) {
            self.scene = scene;
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Right | KeyCode::Char('n') => app.next_scene(),
                KeyCode::Left | KeyCode::Char('p') => app.previous_scene(),
                KeyCode::Char('1') => app.select_scene(0),
                KeyCode::Char('2') => app.select_scene(1),
                KeyCode::Char('3') => app.select_scene(2),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with scene tabs
            Constraint::Min(0),    // Chart area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    // Every draw re-runs the active scene's transform over the full
    // record set. Derived datasets are never cached between scenes.
    match app.scene.dataset(&app.records) {
        SceneData::YearlyTotals(totals) => render_yearly_totals(f, chunks[1], app, &totals),
        SceneData::MarketShare(series) => render_market_share(f, chunks[1], app, &series),
        SceneData::TopBrands(brands) => render_top_brands(f, chunks[1], app, &brands),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];

    for (i, scene) in Scene::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *scene == app.scene {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(
            format!("{}. {}", i + 1, scene.short_name()),
            style,
        ));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Records: {}", app.records.len()),
        Style::default().fg(Color::White),
    ));

    if let Some(year) = latest_year(&app.records) {
        tab_spans.push(Span::raw("  |  "));
        tab_spans.push(Span::styled(
            format!("Latest year: {}", year),
            Style::default().fg(Color::White),
        ));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

/// Caption row shown above every chart: legend swatches plus the
/// scene's annotation text.
fn render_caption(f: &mut Frame, area: Rect, caption: &str) {
    let line = Line::from(vec![
        Span::raw("  "),
        Span::styled("■", Style::default().fg(ASIAN_COLOR)),
        Span::raw(" Asian  "),
        Span::styled("■", Style::default().fg(WESTERN_COLOR)),
        Span::raw(" Western"),
        Span::raw("  │  "),
        Span::styled(
            caption.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    f.render_widget(Paragraph::new(vec![line]), area);
}

fn split_caption_and_chart(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    (chunks[0], chunks[1])
}

fn render_yearly_totals(f: &mut Frame, area: Rect, app: &App, totals: &[YearlyTotal]) {
    if totals.is_empty() {
        render_empty(f, area, app.scene.title());
        return;
    }

    let (caption_area, chart_area) = split_caption_and_chart(area);
    render_caption(f, caption_area, SCENE0_CAPTION);

    let asian: Vec<(f64, f64)> = totals
        .iter()
        .filter(|t| t.origin == BrandOrigin::Asian)
        .map(|t| (t.year as f64, t.sales))
        .collect();
    let western: Vec<(f64, f64)> = totals
        .iter()
        .filter(|t| t.origin == BrandOrigin::Western)
        .map(|t| (t.year as f64, t.sales))
        .collect();

    let (x_lo, x_hi) = year_bounds(totals.iter().map(|t| t.year));

    let sales_lo = totals.iter().map(|t| t.sales).fold(f64::INFINITY, f64::min);
    let sales_hi = totals
        .iter()
        .map(|t| t.sales)
        .fold(f64::NEG_INFINITY, f64::max);
    // Headroom below the smallest value, as in the source chart
    let y_lo = sales_lo * 0.95;
    let y_hi = if sales_hi > y_lo { sales_hi } else { y_lo + 1.0 };

    let datasets = vec![
        Dataset::default()
            .name("Asian")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(ASIAN_COLOR))
            .data(&asian),
        Dataset::default()
            .name("Western")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(WESTERN_COLOR))
            .data(&western),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", app.scene.title())),
        )
        .x_axis(
            Axis::default()
                .title("Year")
                .style(Style::default().fg(Color::Gray))
                .bounds([x_lo, x_hi])
                .labels(year_labels(x_lo, x_hi)),
        )
        .y_axis(
            Axis::default()
                .title("Sales")
                .style(Style::default().fg(Color::Gray))
                .bounds([y_lo, y_hi])
                .labels(vec![
                    Span::raw(format!("{:.0}", y_lo)),
                    Span::raw(format!("{:.0}", (y_lo + y_hi) / 2.0)),
                    Span::raw(format!("{:.0}", y_hi)),
                ]),
        );

    f.render_widget(chart, chart_area);
}

fn render_market_share(f: &mut Frame, area: Rect, app: &App, series: &[StackedSeries]) {
    if series.iter().all(|s| s.bands.is_empty()) {
        render_empty(f, area, app.scene.title());
        return;
    }

    let (caption_area, chart_area) = split_caption_and_chart(area);
    render_caption(f, caption_area, SCENE1_CAPTION);

    // Each origin is drawn as its cumulative upper bound; the gap down
    // to the previous line is that origin's share of the year.
    let lines: Vec<(BrandOrigin, Vec<(f64, f64)>)> = series
        .iter()
        .map(|s| {
            let points = s
                .bands
                .iter()
                .map(|b| (b.year as f64, b.upper))
                .collect::<Vec<_>>();
            (s.origin, points)
        })
        .collect();

    let (x_lo, x_hi) = year_bounds(
        series
            .iter()
            .flat_map(|s| s.bands.iter().map(|b| b.year)),
    );

    let datasets: Vec<Dataset> = lines
        .iter()
        .map(|(origin, points)| {
            Dataset::default()
                .name(origin.name())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(origin_color(*origin)))
                .data(points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", app.scene.title())),
        )
        .x_axis(
            Axis::default()
                .title("Year")
                .style(Style::default().fg(Color::Gray))
                .bounds([x_lo, x_hi])
                .labels(year_labels(x_lo, x_hi)),
        )
        .y_axis(
            Axis::default()
                .title("Share")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, 1.0])
                .labels(vec![
                    Span::raw("0%"),
                    Span::raw("50%"),
                    Span::raw("100%"),
                ]),
        );

    f.render_widget(chart, chart_area);
}

fn render_top_brands(f: &mut Frame, area: Rect, app: &App, brands: &[BrandTotal]) {
    if brands.is_empty() {
        render_empty(f, area, app.scene.title());
        return;
    }

    let (caption_area, chart_area) = split_caption_and_chart(area);
    render_caption(f, caption_area, SCENE2_CAPTION);

    let title = match latest_year(&app.records) {
        Some(year) => format!(" Top 10 Brands by Sales in {} ", year),
        None => format!(" {} ", app.scene.title()),
    };

    let bars: Vec<Bar> = brands
        .iter()
        .map(|b| {
            Bar::default()
                .label(Line::from(truncate(&b.brand, 9)))
                .value(b.sales.round() as u64)
                .style(Style::default().fg(origin_color(b.origin)))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(1);

    f.render_widget(chart, chart_area);
}

fn render_empty(f: &mut Frame, area: Rect, title: &str) {
    let paragraph = Paragraph::new("No records to display").block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", title)),
    );
    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let status_spans = vec![
        Span::styled(
            format!(" Scene: {}/{} ", app.scene.index() + 1, Scene::ALL.len()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("| "),
        Span::styled("→/n", Style::default().fg(Color::Yellow)),
        Span::raw(" Next | "),
        Span::styled("←/p", Style::default().fg(Color::Yellow)),
        Span::raw(" Prev | "),
        Span::styled("1-3", Style::default().fg(Color::Yellow)),
        Span::raw(" Select | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

/// X-axis domain with a small widening when only one year is present
fn year_bounds(years: impl Iterator<Item = i32>) -> (f64, f64) {
    let mut lo = i32::MAX;
    let mut hi = i32::MIN;
    for year in years {
        lo = lo.min(year);
        hi = hi.max(year);
    }

    if lo > hi {
        (0.0, 1.0)
    } else if lo == hi {
        (lo as f64 - 1.0, hi as f64 + 1.0)
    } else {
        (lo as f64, hi as f64)
    }
}

fn year_labels(lo: f64, hi: f64) -> Vec<Span<'static>> {
    let mid = (lo + hi) / 2.0;
    vec![
        Span::raw(format!("{:.0}", lo)),
        Span::raw(format!("{:.0}", mid)),
        Span::raw(format!("{:.0}", hi)),
    ]
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
