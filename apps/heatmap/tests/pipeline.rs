use temperature_heatmap::chart::CHART_TITLE;
use temperature_heatmap::summary::DatasetSummary;
use temperature_heatmap::{
    ChartRenderer, ColorBucketer, Dataset, Layout, PointerEvent, Surface, TooltipController,
};

const BODY: &str = r#"{
    "baseTemperature": 8.66,
    "monthlyVariance": [
        {"year": 1900, "month": 1, "variance": -5.0},
        {"year": 1900, "month": 2, "variance": 0.32},
        {"year": 1950, "month": 7, "variance": 1.25},
        {"year": 2000, "month": 12, "variance": 4.5}
    ]
}"#;

fn render() -> Result<(Dataset, Surface, temperature_heatmap::RenderedChart), Box<dyn std::error::Error>> {
    let dataset = Dataset::from_json(BODY)?;
    let mut surface = Surface::new();
    let chart = ChartRenderer::new(Layout::default(), ColorBucketer::default())
        .render_dataset(&dataset, &mut surface)?;
    Ok((dataset, surface, chart))
}

#[test]
fn coldest_point_renders_as_first_bucket() -> Result<(), Box<dyn std::error::Error>> {
    let (_, surface, _) = render()?;

    let cells = surface.find_all_by_class("cell");
    assert_eq!(cells.len(), 4);

    let first = cells
        .iter()
        .find(|cell| cell.get_attr("data-year") == Some("1900") && cell.get_attr("data-month") == Some("0"))
        .ok_or("January 1900 cell missing")?;
    assert_eq!(first.get_attr("data-temp"), Some("3.7"));
    assert_eq!(first.get_attr("fill"), Some("#4575b4"));
    Ok(())
}

#[test]
fn hover_drives_the_single_tooltip() -> Result<(), Box<dyn std::error::Error>> {
    let (dataset, mut surface, chart) = render()?;
    let mut tooltip = TooltipController::new(dataset.base_temperature());

    let cell = chart.cell_for(1900, 1).ok_or("February 1900 cell missing")?;
    assert!(chart.dispatch(PointerEvent::Enter { cell, x: 80.0, y: 100.0 }, &mut tooltip));
    tooltip.apply(chart.tooltip_element(&mut surface)?);

    let element = surface.find_by_id("tooltip").ok_or("tooltip missing")?;
    let lines: Vec<_> = element.children().iter().filter_map(|line| line.text_content()).collect();
    assert_eq!(lines, ["February 1900", "9.0℃", "+0.3℃"]);
    assert_eq!(element.get_attr("data-year"), Some("1900"));

    chart.dispatch(PointerEvent::Leave, &mut tooltip);
    tooltip.apply(chart.tooltip_element(&mut surface)?);
    let element = surface.find_by_id("tooltip").ok_or("tooltip missing")?;
    assert!(element.children().is_empty());
    Ok(())
}

#[test]
fn exports_html_and_svg() -> Result<(), Box<dyn std::error::Error>> {
    let (_, surface, _) = render()?;

    let html = surface.to_html(CHART_TITLE);
    assert!(html.contains("id=\"chart\""));
    assert!(html.contains("id=\"tooltip\""));
    assert!(html.contains("id=\"legend\""));

    let svg = surface.to_svg().ok_or("no svg")?;
    assert!(svg.contains("class=\"cell\""));
    assert!(!svg.contains("id=\"tooltip\""));

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("heatmap.svg");
    surface.write_document(&path, CHART_TITLE)?;
    assert_eq!(std::fs::read_to_string(path)?, svg);
    Ok(())
}

#[test]
fn summary_counts_match_rendered_cells() -> Result<(), Box<dyn std::error::Error>> {
    let (dataset, _, chart) = render()?;
    let summary = DatasetSummary::build(&dataset, &ColorBucketer::default());

    assert_eq!(summary.points, chart.cells().len());
    assert_eq!(summary.overflow, chart.overflow_count());
    assert_eq!(summary.first_year, Some(1900));
    assert_eq!(summary.last_year, Some(2000));
    Ok(())
}
