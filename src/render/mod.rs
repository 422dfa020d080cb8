//! Screen rendering: lay a `Screen` out top to bottom as a 360-wide SVG page.

pub mod svg;

use crate::geometry::svg_number;
use crate::palette;
use crate::services::dashboard::{OverviewScreen, PortfolioScreen, ProjectsScreen};
use crate::services::projects::{ProjectCard, ProjectScreen};
use crate::services::regions::RegionScreen;
use crate::services::user::UserScreen;
use crate::services::{PhaseCard, Screen, StatCard};

const PAGE_WIDTH: f64 = 360.0;
const MARGIN: f64 = 16.0;
const SECTION_GAP: f64 = 20.0;

/// Vertical page builder. Each block is placed at the current cursor and
/// advances it by the block height.
struct Page {
    body: String,
    cursor: f64,
}

impl Page {
    fn new() -> Self {
        Self {
            body: String::new(),
            cursor: MARGIN,
        }
    }

    fn place(&mut self, x: f64, height: f64, fragment: &str) {
        self.body.push_str(&svg::group(x, self.cursor, fragment));
        self.cursor += height;
    }

    fn heading(&mut self, title: &str) {
        self.place(
            MARGIN,
            28.0,
            &svg::bold_text(0.0, 18.0, 18.0, palette::HEADING, "start", title),
        );
    }

    fn gap(&mut self) {
        self.cursor += SECTION_GAP;
    }

    fn finish(self) -> String {
        svg::document(PAGE_WIDTH, self.cursor + MARGIN, &self.body)
    }
}

fn content_width() -> f64 {
    PAGE_WIDTH - MARGIN * 2.0
}

pub fn render_screen(screen: &Screen) -> String {
    match screen {
        Screen::Overview(s) => render_overview(s),
        Screen::Region(s) => render_region(s),
        Screen::Project(s) => render_project(s),
        Screen::Portfolio(s) => render_portfolio(s),
        Screen::Projects(s) => render_projects(s),
        Screen::User(s) => render_user(s),
    }
}

/// Cards in rows of `per_row`.
fn stat_grid(page: &mut Page, cards: &[StatCard], per_row: usize) {
    let per_row = per_row.max(1);
    let spacing = 8.0;
    let width = (content_width() - spacing * (per_row as f64 - 1.0)) / per_row as f64;
    for row in cards.chunks(per_row) {
        let mut fragment = String::new();
        for (i, card) in row.iter().enumerate() {
            let x = i as f64 * (width + spacing);
            fragment.push_str(&svg::group(
                x,
                0.0,
                &svg::stat_card(width, &card.value, &card.label, &card.tint),
            ));
        }
        page.place(MARGIN, 80.0, &fragment);
    }
}

fn phase_grid(page: &mut Page, cards: &[PhaseCard]) {
    let stats: Vec<StatCard> = cards
        .iter()
        .map(|c| StatCard::new(c.count.to_string(), c.label.clone(), &c.tint))
        .collect();
    stat_grid(page, &stats, 3);
}

/// Horizontal chip row; chips wrap when they run past the content width.
fn chip_row<'a>(page: &mut Page, chips: impl Iterator<Item = (&'a str, bool)>) {
    let mut fragment = String::new();
    let (mut x, mut y) = (0.0, 0.0);
    for (label, selected) in chips {
        let width = 24.0 + label.chars().count() as f64 * 7.0;
        if x > 0.0 && x + width > content_width() {
            x = 0.0;
            y += 36.0;
        }
        fragment.push_str(&svg::group(x, y, &svg::chip(width, label, selected)));
        x += width + 8.0;
    }
    page.place(MARGIN, y + 36.0, &fragment);
}

fn project_cards(page: &mut Page, cards: &[ProjectCard]) {
    for card in cards {
        let size = card.ring.size;
        let height = size.max(56.0) + 16.0;
        let mut fragment = svg::rounded_rect(0.0, 0.0, content_width(), height, 12.0, palette::CARD);
        fragment.push_str(&svg::rounded_rect(0.0, 0.0, 4.0, height, 2.0, &card.accent));
        fragment.push_str(&svg::bold_text(14.0, 24.0, 14.0, palette::TEXT, "start", &card.title));
        fragment.push_str(&svg::text(
            14.0,
            44.0,
            12.0,
            palette::MUTED_TEXT,
            "start",
            &format!("{} · AFE {}", card.phase.label(), card.afe_label),
        ));
        fragment.push_str(&svg::group(
            content_width() - size - 8.0,
            8.0,
            &svg::ring(&card.ring, palette::RING, &card.completion_label, 11.0),
        ));
        page.place(MARGIN, height + 8.0, &fragment);
    }
}

fn render_overview(screen: &OverviewScreen) -> String {
    let mut page = Page::new();
    page.heading("Overview");
    chip_row(
        &mut page,
        screen.regions.iter().map(|r| (r.code.as_str(), false)),
    );
    page.gap();
    stat_grid(&mut page, &screen.stats, 2);
    page.gap();
    page.heading(&format!("Projects by phase ({})", screen.total_projects));
    phase_grid(&mut page, &screen.phase_cards);
    page.finish()
}

fn render_region(screen: &RegionScreen) -> String {
    let mut page = Page::new();
    page.heading(&format!("{} · {}", screen.code, screen.name));
    chip_row(
        &mut page,
        screen.entities.iter().map(|e| (e.name.as_str(), e.selected)),
    );
    page.gap();

    // Equirectangular marker sketch of the region.
    let map_height = 140.0;
    let mut map = svg::rounded_rect(0.0, 0.0, content_width(), map_height, 12.0, palette::TRACK);
    for marker in &screen.markers {
        let x = (marker.coordinate.lon + 180.0) / 360.0 * content_width();
        let y = (90.0 - marker.coordinate.lat) / 180.0 * map_height;
        map.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"9\" fill=\"{}\"/>\n",
            svg_number(x),
            svg_number(y),
            palette::CHIP_SELECTED
        ));
        map.push_str(&svg::text(x, y + 4.0, 10.0, palette::CARD, "middle", &marker.count.to_string()));
    }
    page.place(MARGIN, map_height, &map);
    page.gap();

    phase_grid(&mut page, &screen.phase_cards);
    page.gap();
    page.heading(&screen.section_title);
    project_cards(&mut page, &screen.projects);
    page.finish()
}

fn render_project(screen: &ProjectScreen) -> String {
    let mut page = Page::new();
    page.heading(&screen.title);
    page.place(
        MARGIN,
        24.0,
        &svg::text(
            0.0,
            14.0,
            12.0,
            screen.phase.accent,
            "start",
            &format!("{} · {} · {}", screen.phase.label, screen.entity_name, screen.region),
        ),
    );
    page.gap();

    let donut = &screen.completion;
    page.place(
        (PAGE_WIDTH - donut.size) / 2.0,
        donut.size,
        &svg::ring(donut, palette::DONUT, &screen.completion_label, 24.0),
    );
    page.gap();
    stat_grid(
        &mut page,
        &[StatCard::new(screen.afe_label.clone(), "AFE Amount", "#EEF2FF")],
        1,
    );

    if let Some(description) = &screen.description {
        page.place(
            MARGIN,
            24.0,
            &svg::text(0.0, 14.0, 12.0, palette::TEXT, "start", description),
        );
    }
    for row in &screen.details {
        let mut fragment = svg::text(0.0, 14.0, 12.0, palette::MUTED_TEXT, "start", &row.label);
        fragment.push_str(&svg::text(content_width(), 14.0, 12.0, palette::TEXT, "end", &row.value));
        page.place(MARGIN, 22.0, &fragment);
    }
    page.finish()
}

fn render_portfolio(screen: &PortfolioScreen) -> String {
    let mut page = Page::new();
    page.heading("Portfolio");
    stat_grid(&mut page, &screen.stats, 2);
    page.gap();

    page.heading("Spent");
    let donut = &screen.spent_donut;
    page.place(
        (PAGE_WIDTH - donut.size) / 2.0,
        donut.size,
        &svg::ring(donut, palette::DONUT, &screen.spent_label, 24.0),
    );
    page.gap();
    stat_grid(&mut page, &screen.spent_breakdown, 3);
    page.gap();

    page.heading("Schedule Status");
    page.place(MARGIN, screen.schedule.size, &svg::pie(&screen.schedule));
    if let Some(hopm) = &screen.hopm {
        page.gap();
        page.heading("HO PM Distribution");
        page.place(MARGIN, hopm.size, &svg::pie(hopm));
    }
    page.finish()
}

fn render_projects(screen: &ProjectsScreen) -> String {
    let mut page = Page::new();
    page.heading("AFE by Project");
    page.place(
        0.0,
        screen.afe_by_project.height,
        &svg::bars(&screen.afe_by_project, &screen.value_labels),
    );
    page.gap();
    page.heading("Project AFE");
    let labels: Vec<String> = screen
        .project_afe
        .bars
        .iter()
        .map(|b| crate::format::format_millions(b.value))
        .collect();
    page.place(0.0, screen.project_afe.height, &svg::bars(&screen.project_afe, &labels));
    page.finish()
}

fn render_user(screen: &UserScreen) -> String {
    let mut page = Page::new();
    page.heading(&screen.display_name);
    page.place(
        MARGIN,
        24.0,
        &svg::text(0.0, 14.0, 12.0, palette::MUTED_TEXT, "start", &screen.status_label),
    );
    page.gap();
    let settings = &screen.settings;
    let rows = [
        ("Theme", format!("{:?}", settings.theme)),
        ("Language", settings.language.clone()),
        (
            "Notifications",
            if settings.notifications { "On" } else { "Off" }.to_string(),
        ),
    ];
    for (label, value) in rows {
        let mut fragment = svg::text(0.0, 14.0, 12.0, palette::MUTED_TEXT, "start", label);
        fragment.push_str(&svg::text(content_width(), 14.0, 12.0, palette::TEXT, "end", &value));
        page.place(MARGIN, 22.0, &fragment);
    }
    page.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::services::build_screen;
    use crate::state::{reduce, Action, AppState, PortfolioView, Tab};
    use crate::types::{ChartDefaults, RegionCode};

    fn render(state: &AppState) -> String {
        let catalog = Catalog::embedded().unwrap();
        let screen = build_screen(&catalog, &ChartDefaults::default(), state).unwrap();
        render_screen(&screen)
    }

    #[test]
    fn test_overview_svg() {
        let svg = render(&AppState::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Projects by phase (2)"));
        assert!(svg.contains("$5,489.5M"));
    }

    #[test]
    fn test_region_svg_escapes_names() {
        let state = reduce(&AppState::default(), Action::SelectRegion(Some(RegionCode::Sco)));
        let svg = render(&state);
        assert!(svg.contains("South &amp; Central"));
        assert!(!svg.contains("South & Central"));
    }

    #[test]
    fn test_portfolio_svg_has_donut_and_pies() {
        let state = reduce(&AppState::default(), Action::SelectTab(Tab::Portfolio));
        let svg = render(&state);
        assert!(svg.contains(">45%</text>"));
        assert!(svg.contains("HO PM Distribution"));
        // three schedule wedges plus four HO PM wedges
        assert_eq!(svg.matches("<path").count(), 7);
    }

    #[test]
    fn test_projects_svg_has_bars() {
        let state = reduce(&AppState::default(), Action::SelectTab(Tab::Portfolio));
        let state = reduce(&state, Action::SelectPortfolioView(PortfolioView::Projects));
        let svg = render(&state);
        assert!(svg.contains("5,829"));
        assert!(svg.contains("$50.65M"));
    }

    #[test]
    fn test_project_svg() {
        let state = reduce(&AppState::default(), Action::SelectProject(Some("sndkr".into())));
        let svg = render(&state);
        assert!(svg.contains("SNDKR Ndayane Port"));
        assert!(svg.contains("Ian Wilcock"));
    }
}
