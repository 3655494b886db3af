//! Assembles linked climb grids into a serializable page model.

use crate::{
    alias::{index_redirect, resolve_aliases, AliasMap, Redirect},
    climb::Climb,
    conditions::{Conditions, Forecast, ScoredCondition},
    context::{GridContext, HourWindow, View},
    error::ForecastError,
    grid::{build_climb_grid, ClimbForecast},
    historical::HistoricalLookup,
    navigation::{cell_slug, climb_navigation, day_time_navigation, Navigation},
    scoring::ScoringOracle,
    slug::CURRENT_SLUG,
};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use windsock_utils::dates;

/// Metadata shared by every page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Path relative to the site root, empty for the root page.
    pub canonical_path: String,
    pub title: String,
    pub default_view: View,
}

impl Layout {
    fn new<Tz: TimeZone>(ctx: &GridContext<Tz>, slug: &str, subtitle: Option<&str>) -> Self {
        let canonical_path = if slug.is_empty() {
            String::new()
        } else {
            format!("{slug}/")
        };
        let title = match subtitle {
            Some(subtitle) => format!("{} - {subtitle}", ctx.title),
            None => ctx.title.clone(),
        };
        Layout {
            canonical_path,
            title,
            default_view: ctx.default_view,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootEntry {
    pub slug: String,
    pub name: String,
    pub direction: &'static str,
    pub current: Option<ScoredCondition>,
    pub best_baseline: Option<ScoredCondition>,
    pub best_historical: Option<ScoredCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootPage {
    pub layout: Layout,
    pub climbs: Vec<RootEntry>,
}

/// One climb's conditions at a day-time slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimbConditions {
    pub slug: String,
    pub name: String,
    pub direction: &'static str,
    pub conditions: ScoredCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTimePage {
    pub layout: Layout,
    pub slug: String,
    pub local_time: DateTime<FixedOffset>,
    pub day_time: String,
    pub climbs: Vec<ClimbConditions>,
    pub historical_average: Option<Conditions>,
    pub navigation: Navigation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimbRow {
    /// Time of the first present cell in the row.
    pub local_time: Option<DateTime<FixedOffset>>,
    pub time: String,
    pub historical_average: Option<Conditions>,
    /// One slot per day.
    pub cells: Vec<Option<ScoredCondition>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimbPage {
    pub layout: Layout,
    pub slug: String,
    pub name: String,
    pub direction: &'static str,
    pub current: Option<ScoredCondition>,
    pub days: Vec<String>,
    pub short_days: Vec<String>,
    pub rows: Vec<ClimbRow>,
    pub navigation: Navigation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Page {
    Root(RootPage),
    DayTime(DayTimePage),
    Climb(ClimbPage),
}

impl Page {
    /// Directory of the page, empty for the root.
    pub fn slug(&self) -> &str {
        match self {
            Page::Root(_) => "",
            Page::DayTime(page) => &page.slug,
            Page::Climb(page) => &page.slug,
        }
    }

    pub fn layout(&self) -> &Layout {
        match self {
            Page::Root(page) => &page.layout,
            Page::DayTime(page) => &page.layout,
            Page::Climb(page) => &page.layout,
        }
    }
}

/// The whole generated site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Site {
    pub generated_at: DateTime<Utc>,
    /// Generation time in the run's zone, e.g. "Jun 17 05:00:00"
    pub generated: String,
    pub window: HourWindow,
    pub default_view: View,
    pub title: String,
    pub absolute_url: String,
    /// Number of built climbs in the cross-climb sequence.
    pub hidden: usize,
    pub climbs: Vec<ClimbForecast>,
    pub pages: Vec<Page>,
    /// `index.html` of every page directory.
    pub index_redirects: Vec<Redirect>,
    pub aliases: AliasMap,
}

impl Site {
    pub fn page(&self, slug: &str) -> Option<&Page> {
        self.pages.iter().find(|page| page.slug() == slug)
    }

    pub fn visible(&self) -> &[ClimbForecast] {
        &self.climbs[..self.hidden.min(self.climbs.len())]
    }
}

/// A site plus the climbs that could not be built.
#[derive(Debug)]
pub struct SiteBuild {
    pub site: Site,
    pub failures: Vec<ForecastError>,
}

/// Build every climb's grid in parallel, then link and assemble the pages.
///
/// The first `hidden` climbs form the cross-climb sequence. A climb that fails
/// is reported in `failures` and left out; the sequence closes over the gap.
pub fn build_site<Tz, L, O>(
    ctx: &GridContext<Tz>,
    climbs: Vec<(Climb, Forecast)>,
    hidden: usize,
    lookup: &L,
    oracle: &O,
) -> SiteBuild
where
    Tz: TimeZone + Sync,
    L: HistoricalLookup + ?Sized,
    O: ScoringOracle + ?Sized,
{
    let total = climbs.len();
    let results: Vec<_> = climbs
        .into_par_iter()
        .map(|(climb, forecast)| {
            let grid = build_climb_grid(ctx, &climb, &forecast, lookup, oracle);
            (climb, grid)
        })
        .collect();

    let mut built: Vec<ClimbForecast> = Vec::with_capacity(total);
    let mut failures = Vec::new();
    let mut visible = 0;
    for (index, (climb, grid)) in results.into_iter().enumerate() {
        let grid = grid.and_then(|grid| {
            let slug = climb.slug();
            match built.iter().find(|cf| cf.slug() == slug) {
                Some(owner) => Err(ForecastError::DuplicateSlug {
                    climb: climb.name.clone(),
                    slug,
                    owner: owner.climb.name.clone(),
                }),
                None => Ok(grid),
            }
        });
        match grid {
            Ok(grid) => {
                if index < hidden {
                    visible += 1;
                }
                built.push(ClimbForecast { climb, grid });
            }
            Err(err) => failures.push(err),
        }
    }
    info!(
        "built {} of {} climbs ({} in sequence)",
        built.len(),
        total,
        visible
    );

    let mut pages = vec![Page::Root(root_page(ctx, &built[..visible]))];
    pages.extend(
        day_time_pages(ctx, &built[..visible], lookup)
            .into_iter()
            .map(Page::DayTime),
    );
    let slugs: Vec<String> = built.iter().map(ClimbForecast::slug).collect();
    pages.extend(
        built
            .iter()
            .enumerate()
            .map(|(k, cf)| Page::Climb(climb_page(ctx, cf, &slugs, k, visible, lookup))),
    );

    let index_redirects = pages
        .iter()
        .map(|page| index_redirect(page.slug(), ctx.default_view))
        .collect();
    let aliases = resolve_aliases(built.iter().map(|cf| &cf.climb));
    info!(
        "assembled {} pages and {} aliases",
        pages.len(),
        aliases.aliases.len()
    );

    SiteBuild {
        site: Site {
            generated_at: ctx.generated_at,
            generated: dates::stamp(&ctx.local(&ctx.generated_at)),
            window: ctx.window,
            default_view: ctx.default_view,
            title: ctx.title.clone(),
            absolute_url: ctx.absolute_url.clone(),
            hidden: visible,
            climbs: built,
            pages,
            index_redirects,
            aliases,
        },
        failures,
    }
}

fn root_page<Tz: TimeZone>(ctx: &GridContext<Tz>, visible: &[ClimbForecast]) -> RootPage {
    let climbs = visible
        .iter()
        .map(|cf| RootEntry {
            slug: cf.slug(),
            name: cf.climb.name.clone(),
            direction: cf.direction(),
            current: cf.grid.current.clone(),
            best_baseline: cf.grid.best(View::Baseline).cloned(),
            best_historical: cf.grid.best(View::Historical).cloned(),
        })
        .collect();
    RootPage {
        layout: Layout::new(ctx, "", None),
        climbs,
    }
}

/// One page per distinct slot across the visible climbs, in first-seen order.
///
/// A cell whose slug already names a page for a different instant is left
/// off that page rather than merged into it.
fn day_time_pages<Tz, L>(
    ctx: &GridContext<Tz>,
    visible: &[ClimbForecast],
    lookup: &L,
) -> Vec<DayTimePage>
where
    Tz: TimeZone,
    L: HistoricalLookup + ?Sized,
{
    let mut pages: Vec<DayTimePage> = Vec::new();
    let mut by_slug: HashMap<String, usize> = HashMap::new();

    for cf in visible {
        for (position, cell) in cf.grid.cells() {
            let slug = cell_slug(&cf.grid, position);
            let index = match by_slug.get(&slug) {
                Some(&index) => {
                    let page = &pages[index];
                    if slug != CURRENT_SLUG && page.local_time != cell.local_time {
                        warn!(
                            "{}: {} is not {}, leaving it off {slug}",
                            cf.climb.name,
                            cell.full_time(),
                            dates::full_time(&page.local_time)
                        );
                        continue;
                    }
                    index
                }
                None => {
                    let day_time = cf
                        .grid
                        .day_time_label(position)
                        .unwrap_or_else(|| cell.day_time());
                    pages.push(DayTimePage {
                        layout: Layout::new(ctx, &slug, Some(day_time.as_str())),
                        slug: slug.clone(),
                        local_time: cell.local_time,
                        day_time,
                        climbs: Vec::new(),
                        historical_average: lookup.average_at(&cf.climb, &cell.local_time).cloned(),
                        navigation: day_time_navigation(&cf.grid, position),
                    });
                    by_slug.insert(slug, pages.len() - 1);
                    pages.len() - 1
                }
            };
            pages[index].climbs.push(ClimbConditions {
                slug: cf.slug(),
                name: cf.climb.name.clone(),
                direction: cf.direction(),
                conditions: cell.clone(),
            });
        }
    }
    debug!("{} day-time pages", pages.len());
    pages
}

fn climb_page<Tz, L>(
    ctx: &GridContext<Tz>,
    cf: &ClimbForecast,
    slugs: &[String],
    k: usize,
    hidden: usize,
    lookup: &L,
) -> ClimbPage
where
    Tz: TimeZone,
    L: HistoricalLookup + ?Sized,
{
    let days = &cf.grid.days;
    let rows = (0..cf.grid.hours())
        .map(|hour| {
            let cells: Vec<Option<ScoredCondition>> =
                days.iter().map(|day| day.get(hour).cloned()).collect();
            let first = cells.iter().flatten().next();
            let local_time = first.map(|c| c.local_time);
            ClimbRow {
                local_time,
                time: local_time.map(|t| dates::short_time(&t)).unwrap_or_default(),
                historical_average: first
                    .and_then(|c| lookup.average_at(&cf.climb, &c.local_time))
                    .cloned(),
                cells,
            }
        })
        .collect();

    let slug = cf.slug();
    ClimbPage {
        layout: Layout::new(ctx, &slug, Some(cf.climb.name.as_str())),
        slug,
        name: cf.climb.name.clone(),
        direction: cf.direction(),
        current: cf.grid.current.clone(),
        days: days.iter().map(|d| d.day.clone()).collect(),
        short_days: days.iter().map(|d| d.short_day()).collect(),
        rows,
        navigation: climb_navigation(slugs, k, hidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        climb::Segment,
        conditions::Scores,
        error::OracleError,
        historical::NoHistoricalData,
        slug::CURRENT_SLUG,
        day_bucket::CellPosition,
        testing::{climb, context, hour_oracle, hourly_forecast, pacific, week_forecast},
    };
    use chrono::Datelike;

    fn inputs(names: &[&str]) -> Vec<(Climb, Forecast)> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| (climb(name, i as i64 + 1), week_forecast()))
            .collect()
    }

    fn climb_pages(site: &Site) -> Vec<&ClimbPage> {
        site.pages
            .iter()
            .filter_map(|page| match page {
                Page::Climb(page) => Some(page),
                _ => None,
            })
            .collect()
    }

    fn rejects_segment_two(
        segment: &Segment,
        current: &Conditions,
        past: Option<&Conditions>,
    ) -> std::result::Result<Scores, OracleError> {
        if segment.id == 2 {
            return Err(OracleError::InvalidSegment {
                segment: segment.name.clone(),
                reason: String::from("distance must be positive"),
            });
        }
        hour_oracle(segment, current, past)
    }

    #[test]
    fn test_failing_climb_does_not_block_siblings() {
        let build = build_site(
            &context(6, 18),
            inputs(&["Old La Honda", "Kings Mountain", "Page Mill"]),
            3,
            &NoHistoricalData,
            &rejects_segment_two,
        );
        assert_eq!(build.failures.len(), 1);
        assert_eq!(build.failures[0].climb(), Some("Kings Mountain"));

        let site = build.site;
        assert_eq!(site.hidden, 2);
        let slugs: Vec<String> = site.climbs.iter().map(ClimbForecast::slug).collect();
        assert_eq!(slugs, vec!["old-la-honda", "page-mill"]);

        let pages = climb_pages(&site);
        assert_eq!(pages[0].navigation.down, "page-mill");
        assert_eq!(pages[1].navigation.up, "old-la-honda");
        assert_eq!(pages[1].navigation.down, "");
        assert!(site.page("kings-mountain").is_none());
    }

    #[test]
    fn test_hidden_climbs_have_pages_without_links() {
        let build = build_site(
            &context(6, 18),
            inputs(&["Old La Honda", "Kings Mountain", "Page Mill"]),
            2,
            &NoHistoricalData,
            &hour_oracle,
        );
        assert!(build.failures.is_empty());
        let site = build.site;
        assert_eq!(site.visible().len(), 2);

        match site.page("").unwrap() {
            Page::Root(root) => assert_eq!(root.climbs.len(), 2),
            other => panic!("unexpected page: {other:?}"),
        }
        let pages = climb_pages(&site);
        assert_eq!(pages.len(), 3);
        assert!(pages[2].navigation.is_empty());
        assert_eq!(pages[1].navigation.down, "");

        match site.page("saturday-8am").unwrap() {
            Page::DayTime(page) => {
                let names: Vec<&str> = page.climbs.iter().map(|c| c.name.as_str()).collect();
                assert_eq!(names, vec!["Old La Honda", "Kings Mountain"]);
            }
            other => panic!("unexpected page: {other:?}"),
        }
    }

    #[test]
    fn test_current_slot_gets_reserved_page() {
        let site = build_site(
            &context(6, 18),
            inputs(&["Old La Honda"]),
            1,
            &NoHistoricalData,
            &hour_oracle,
        )
        .site;
        assert!(site.page("saturday-7am").is_none());
        match site.page(CURRENT_SLUG).unwrap() {
            Page::DayTime(page) => {
                assert_eq!(page.day_time, "Saturday 7AM");
                assert_eq!(page.layout.canonical_path, "current/");
                assert_eq!(page.layout.title, "Windsock - Saturday 7AM");
                assert_eq!(page.navigation.down, "saturday-8am");
                assert_eq!(page.navigation.right, "sunday-7am");
            }
            other => panic!("unexpected page: {other:?}"),
        }
    }

    #[test]
    fn test_climb_page_rows() {
        let site = build_site(
            &context(6, 8),
            inputs(&["Old La Honda"]),
            1,
            &NoHistoricalData,
            &hour_oracle,
        )
        .site;
        let page = climb_pages(&site)[0];
        assert_eq!(page.days.len(), 8);
        assert_eq!(page.short_days[0], "Sat");
        assert_eq!(page.rows.len(), 3);
        // The first day has no 6AM cell, so the row's time comes from Sunday.
        assert!(page.rows[0].cells[0].is_none());
        assert_eq!(page.rows[0].time, "6AM");
        assert_eq!(page.rows[2].cells.len(), 8);
        assert!(page.rows[2].cells[7].is_none());
        assert_eq!(page.layout.title, "Windsock - Old La Honda");
    }

    #[test]
    fn test_index_redirects_follow_default_view() {
        let ctx = context(6, 18).with_default_view(View::Historical);
        let site = build_site(
            &ctx,
            inputs(&["Old La Honda"]),
            1,
            &NoHistoricalData,
            &hour_oracle,
        )
        .site;
        assert_eq!(site.index_redirects.len(), site.pages.len());
        assert!(site
            .index_redirects
            .iter()
            .all(|r| r.target == "historical/index.html"));
        assert_eq!(site.index_redirects[0].path, "index.html");
    }

    #[test]
    fn test_empty_forecast_builds_empty_climb() {
        let start = pacific().with_ymd_and_hms(2023, 6, 17, 7, 0, 0).unwrap();
        let climbs = vec![
            (climb("Old La Honda", 1), hourly_forecast(start, 7 * 24)),
            (climb("Page Mill", 3), Forecast::default()),
        ];
        let build = build_site(&context(6, 18), climbs, 2, &NoHistoricalData, &hour_oracle);
        assert!(build.failures.is_empty());
        let pages = climb_pages(&build.site);
        assert!(pages[1].rows.is_empty());
        assert_eq!(pages[0].navigation.down, "page-mill");
    }

    #[test]
    fn test_duplicate_slug_keeps_first_climb() {
        let climbs = vec![
            (climb("Old La Honda", 1), week_forecast()),
            (climb("Old-La-Honda", 2), week_forecast()),
            (climb("Page Mill", 3), week_forecast()),
        ];
        let build = build_site(&context(6, 18), climbs, 3, &NoHistoricalData, &hour_oracle);
        assert_eq!(build.failures.len(), 1);
        assert!(matches!(
            &build.failures[0],
            ForecastError::DuplicateSlug { climb, slug, owner }
                if climb == "Old-La-Honda" && slug == "old-la-honda" && owner == "Old La Honda"
        ));

        let site = build.site;
        assert_eq!(site.hidden, 2);
        let pages = climb_pages(&site);
        let slugs: Vec<&str> = pages.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, site.aliases.canonical);
        assert_eq!(pages[0].navigation.down, "page-mill");

        let mut dirs: Vec<&str> = site.index_redirects.iter().map(|r| r.path.as_str()).collect();
        let count = dirs.len();
        dirs.sort_unstable();
        dirs.dedup();
        assert_eq!(dirs.len(), count);
    }

    #[test]
    fn test_repeated_weekday_gets_its_own_pages() {
        use chrono_tz::America::Los_Angeles;

        // Spring forward on 2024-03-10: 170 hours from Saturday 07:00 PST end
        // on the next Saturday at 09:00 PDT, overlapping the first day's hours.
        let generated_at = Utc.with_ymd_and_hms(2024, 3, 9, 15, 0, 0).unwrap();
        let ctx = GridContext::new(generated_at, Los_Angeles, HourWindow::new(6, 18).unwrap());
        let start = Los_Angeles.with_ymd_and_hms(2024, 3, 9, 7, 0, 0).unwrap();
        let climbs = vec![
            (climb("Old La Honda", 1), hourly_forecast(start.fixed_offset(), 170)),
            (climb("Kings Mountain", 2), hourly_forecast(start.fixed_offset(), 170)),
        ];
        let build = build_site(&ctx, climbs, 2, &NoHistoricalData, &hour_oracle);
        assert!(build.failures.is_empty());
        let site = build.site;

        let grid = &site.climbs[0].grid;
        assert_eq!(grid.days.len(), 8);
        assert_eq!(grid.days[7].key, "Saturday 16");
        assert!(grid.repeats_weekday(7));
        assert!(!grid.repeats_weekday(0));

        let day_time = |slug: &str| match site.page(slug) {
            Some(Page::DayTime(page)) => page.clone(),
            other => panic!("unexpected page for {slug}: {other:?}"),
        };
        let first = day_time("saturday-8am");
        let last = day_time("saturday-16-8am");
        assert_eq!(first.local_time.day(), 9);
        assert_eq!(last.local_time.day(), 16);
        assert_eq!(last.day_time, "Saturday 16 8AM");
        assert_eq!(last.climbs.len(), 2);
        assert!(day_time("saturday-16-9am").climbs.len() == 2);

        for page in site.pages.iter() {
            if let Page::DayTime(page) = page {
                if page.slug != CURRENT_SLUG {
                    assert!(page.climbs.iter().all(|c| c.conditions.local_time == page.local_time));
                }
            }
        }

        assert_eq!(day_time("friday-8am").navigation.right, "saturday-16-8am");
        assert_eq!(last.navigation.left, "friday-8am");
        assert_eq!(last.navigation.up, "saturday-16-7am");
        assert_eq!(last.navigation.down, "saturday-16-9am");

        for (position, _) in grid.cells() {
            let nav = day_time_navigation(grid, position);
            let own = cell_slug(grid, position);
            if !nav.right.is_empty() {
                let right = CellPosition {
                    day: position.day + 1,
                    hour: position.hour,
                };
                assert_eq!(day_time_navigation(grid, right).left, own);
            }
        }
    }

    #[test]
    fn test_site_serializes_page_kinds() {
        let site = build_site(
            &context(6, 18),
            inputs(&["Old La Honda"]),
            1,
            &NoHistoricalData,
            &hour_oracle,
        )
        .site;
        let json = serde_json::to_value(&site).unwrap();
        assert_eq!(json["pages"][0]["kind"], "root");
        assert_eq!(json["pages"][1]["kind"], "day_time");
        assert_eq!(json["default_view"], "baseline");
    }
}
