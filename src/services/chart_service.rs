use chrono::{Duration, NaiveDate, Utc};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::api::exchangerate::RatesClient;
use crate::models::{ChartFile, ChartSeries, HistoricalPoint};
use crate::utils::ServiceError;

pub const DEFAULT_DAYS: u32 = 7;
const CHART_WIDTH: u32 = 1000;
const CHART_HEIGHT: u32 = 500;

/// Dates of the trailing window ending the day before `today`, oldest first
pub fn window_dates(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days)
        .map(|i| today - Duration::days(i64::from(days - i)))
        .collect()
}

/// Look up the historical rate for every date in the window.
///
/// A failed date is skipped and counted; it never fails the whole series.
#[instrument(skip(client))]
pub async fn collect_series(
    client: &RatesClient,
    base: &str,
    target: &str,
    days: u32,
    today: NaiveDate,
) -> ChartSeries {
    let mut points = Vec::with_capacity(days as usize);
    let mut failed_days = 0;

    for date in window_dates(today, days) {
        match client.get_historical_rate(date, base, target).await {
            Ok(rate) => points.push(HistoricalPoint {
                date,
                base: base.to_string(),
                target: target.to_string(),
                rate,
            }),
            Err(e) => {
                debug!("Skipping {}: {}", date, e);
                failed_days += 1;
            }
        }
    }

    if failed_days > 0 {
        debug!("{} of {} days had no data", failed_days, days);
    }

    ChartSeries {
        base: base.to_string(),
        target: target.to_string(),
        days,
        points,
        failed_days,
    }
}

/// Build a rate chart for the `days` days before today and write it to `out_dir`
pub async fn generate_chart(
    client: &RatesClient,
    base: &str,
    target: &str,
    days: u32,
    out_dir: &Path,
) -> Result<ChartFile, ServiceError> {
    let today = Utc::now().date_naive();
    generate_chart_for(client, base, target, days, today, out_dir).await
}

#[instrument(skip(client, out_dir))]
pub async fn generate_chart_for(
    client: &RatesClient,
    base: &str,
    target: &str,
    days: u32,
    today: NaiveDate,
    out_dir: &Path,
) -> Result<ChartFile, ServiceError> {
    let series = collect_series(client, base, target, days, today).await;

    if series.is_empty() {
        warn!("No historical data for {}/{} in the last {} days", base, target, days);
        return Err(ServiceError::NoChartData {
            base: base.to_string(),
            target: target.to_string(),
        });
    }

    let path = chart_path(out_dir, base, target);
    render_chart(&series, &path)?;

    info!("✓ Chart for {}/{} written to {} ({} points)", base, target, path.display(), series.points.len());

    Ok(ChartFile {
        path,
        points: series.points.len(),
        failed_days: series.failed_days,
    })
}

/// Unique per request, so concurrent charts for the same pair never share a file
pub fn chart_path(out_dir: &Path, base: &str, target: &str) -> PathBuf {
    out_dir.join(format!("chart_{}_{}_{}.png", base, target, Uuid::new_v4().simple()))
}

/// Render the series as a PNG line chart with a marker per point.
///
/// If the labelled chart cannot be drawn (no usable system font), the chart is
/// drawn again without caption and axis labels.
pub fn render_chart(series: &ChartSeries, path: &Path) -> Result<(), ServiceError> {
    let points = &series.points;
    if points.is_empty() {
        return Err(ServiceError::NoChartData {
            base: series.base.clone(),
            target: series.target.clone(),
        });
    }

    let result = draw_png(series, path, true).or_else(|e| {
        warn!("Labelled chart failed ({}), drawing without text", e);
        draw_png(series, path, false)
    });
    if result.is_err() && path.exists() {
        let _ = std::fs::remove_file(path);
    }
    result
}

fn draw_png(series: &ChartSeries, path: &Path, labelled: bool) -> Result<(), ServiceError> {
    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    draw_on(&root, series, labelled)
}

fn draw_on<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &ChartSeries,
    labelled: bool,
) -> Result<(), ServiceError> {
    let points = &series.points;
    let labels: Vec<String> = points
        .iter()
        .map(|p| p.date.format("%Y-%m-%d").to_string())
        .collect();

    root.fill(&WHITE)
        .map_err(|e| ServiceError::Render(format!("Failed to fill canvas: {}", e)))?;

    // Add some padding to the rate range
    let min_rate = series.min_rate();
    let max_rate = series.max_rate();
    let rate_range = (max_rate - min_rate).max(max_rate.abs() * 0.01).max(1e-8);
    let padding = rate_range * 0.1;
    let y_min = (min_rate - padding).max(0.0);
    let y_max = max_rate + padding;

    // One x unit per point; labels are looked up by index
    let x_min = -0.5;
    let x_max = points.len() as f64 - 0.5;

    let mut builder = ChartBuilder::on(root);
    builder.margin(15);
    if labelled {
        builder
            .caption(
                format!(
                    "{}/{} rate over the last {} days",
                    series.base, series.target, series.days
                ),
                ("sans-serif", 30.0).into_font(),
            )
            .x_label_area_size(90)
            .y_label_area_size(70);
    }
    let mut chart = builder
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| ServiceError::Render(format!("Failed to build chart: {}", e)))?;

    let date_label = |x: &f64| {
        let index = x.round();
        if (x - index).abs() > 1e-6 || index < 0.0 {
            return String::new();
        }
        labels.get(index as usize).cloned().unwrap_or_default()
    };

    if labelled {
        chart
            .configure_mesh()
            .x_labels(points.len())
            .x_label_formatter(&date_label)
            .x_label_style(
                ("sans-serif", 12.0)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_desc("Date")
            .y_desc("Rate")
            .draw()
            .map_err(|e| ServiceError::Render(format!("Failed to draw mesh: {}", e)))?;
    }

    chart
        .draw_series(LineSeries::new(
            points.iter().enumerate().map(|(i, p)| (i as f64, p.rate)),
            &BLUE,
        ))
        .map_err(|e| ServiceError::Render(format!("Failed to draw line: {}", e)))?;

    chart
        .draw_series(
            points
                .iter()
                .enumerate()
                .map(|(i, p)| Circle::new((i as f64, p.rate), 4, BLUE.filled())),
        )
        .map_err(|e| ServiceError::Render(format!("Failed to draw point: {}", e)))?;

    root.present()
        .map_err(|e| ServiceError::Render(format!("Failed to render chart: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Serve RUB rates for the given dates; everything else gets a 404
    async fn history_server(dates: &[(&str, f64)]) -> MockServer {
        let server = MockServer::start().await;
        for (day, rate) in dates {
            Mock::given(method("GET"))
                .and(path(format!("/{}", day)))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string(format!(r#"{{"rates": {{"RUB": {}}}}}"#, rate)),
                )
                .mount(&server)
                .await;
        }
        server
    }

    #[test]
    fn test_window_dates() {
        let dates = window_dates(date("2024-03-08"), 7);
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], date("2024-03-01"));
        assert_eq!(dates[6], date("2024-03-07"));
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert!(window_dates(date("2024-03-08"), 0).is_empty());
    }

    #[tokio::test]
    async fn test_collect_series_skips_failed_days() {
        // 3 of 7 days have no data
        let server = history_server(&[
            ("2024-03-01", 90.0),
            ("2024-03-03", 91.0),
            ("2024-03-04", 92.5),
            ("2024-03-07", 93.0),
        ])
        .await;
        let client = RatesClient::new(&server.uri()).unwrap();

        let series = collect_series(&client, "USD", "RUB", 7, date("2024-03-08")).await;

        assert_eq!(series.points.len(), 4);
        assert_eq!(series.failed_days, 3);
        assert!(series.points.windows(2).all(|w| w[0].date < w[1].date));
        let rates: Vec<f64> = series.points.iter().map(|p| p.rate).collect();
        assert_eq!(rates, vec![90.0, 91.0, 92.5, 93.0]);
        assert_eq!(series.points[0].base, "USD");
        assert_eq!(series.points[0].target, "RUB");
    }

    #[tokio::test]
    async fn test_collect_series_never_exceeds_window() {
        let server = history_server(&[
            ("2024-02-27", 1.0),
            ("2024-02-28", 2.0),
            ("2024-02-29", 3.0),
            ("2024-03-01", 4.0),
        ])
        .await;
        let client = RatesClient::new(&server.uri()).unwrap();

        let series = collect_series(&client, "USD", "RUB", 2, date("2024-03-01")).await;

        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].date, date("2024-02-28"));
        assert_eq!(series.points[1].date, date("2024-02-29"));
    }

    #[tokio::test]
    async fn test_generate_chart_without_data_fails() {
        let server = MockServer::start().await;
        let client = RatesClient::new(&server.uri()).unwrap();
        let out_dir = tempfile::tempdir().unwrap();

        let err = generate_chart(&client, "USD", "RUB", DEFAULT_DAYS, out_dir.path())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::NoChartData { ref base, ref target } if base == "USD" && target == "RUB"
        ));
        assert_eq!(std::fs::read_dir(out_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_chart_paths_are_unique_per_request() {
        let dir = Path::new("/tmp");
        let first = chart_path(dir, "USD", "RUB");
        let second = chart_path(dir, "USD", "RUB");

        assert_ne!(first, second);
        let name = first.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("chart_USD_RUB_"));
        assert!(name.ends_with(".png"));
    }

    fn series(rates: &[(&str, f64)]) -> ChartSeries {
        ChartSeries {
            base: "USD".to_string(),
            target: "RUB".to_string(),
            days: 7,
            points: rates
                .iter()
                .map(|(day, rate)| HistoricalPoint {
                    date: date(day),
                    base: "USD".to_string(),
                    target: "RUB".to_string(),
                    rate: *rate,
                })
                .collect(),
            failed_days: 7 - rates.len(),
        }
    }

    #[test]
    fn test_unlabelled_chart_draws_in_memory() {
        let (width, height) = (200u32, 100u32);
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            draw_on(&root, &series(&[("2024-03-01", 90.0), ("2024-03-04", 92.5)]), false)
                .unwrap();
        }

        // Background is white; the line and markers are blue
        assert!(buffer.chunks(3).any(|px| px == [255, 255, 255]));
        assert!(buffer.chunks(3).any(|px| px == [0, 0, 255]));
    }

    #[test]
    fn test_render_chart_writes_png() {
        let out_dir = tempfile::tempdir().unwrap();
        let path = chart_path(out_dir.path(), "USD", "RUB");

        render_chart(&series(&[("2024-03-01", 90.0), ("2024-03-03", 91.0)]), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn test_render_chart_single_point() {
        let out_dir = tempfile::tempdir().unwrap();
        let path = chart_path(out_dir.path(), "USD", "RUB");

        render_chart(&series(&[("2024-03-01", 90.0)]), &path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_render_empty_series_writes_nothing() {
        let out_dir = tempfile::tempdir().unwrap();
        let path = chart_path(out_dir.path(), "USD", "RUB");

        let err = render_chart(&series(&[]), &path).unwrap_err();

        assert!(matches!(err, ServiceError::NoChartData { .. }));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_generate_chart_writes_partial_series() {
        let server = history_server(&[
            ("2024-03-01", 90.0),
            ("2024-03-03", 91.0),
            ("2024-03-04", 92.5),
            ("2024-03-07", 93.0),
        ])
        .await;
        let client = RatesClient::new(&server.uri()).unwrap();
        let out_dir = tempfile::tempdir().unwrap();

        let chart = generate_chart_for(&client, "USD", "RUB", 7, date("2024-03-08"), out_dir.path())
            .await
            .unwrap();

        assert_eq!(chart.points, 4);
        assert_eq!(chart.failed_days, 3);
        assert!(chart.path().exists());
        let path = chart.path().to_path_buf();
        chart.remove().unwrap();
        assert!(!path.exists());
    }
}
