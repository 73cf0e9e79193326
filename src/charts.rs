use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{info, warn};

use crate::error::Error;
use crate::report::{thousands, ChartSeries, ChartSet};
use crate::types::Result;

type DrawResult<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Presentation settings shared by every chart. Built once and passed down.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub font_family: String,
    pub title_size: u32,
    pub caption_size: u32,
    pub label_size: u32,
    pub demographics_size: (u32, u32),
    pub geography_size: (u32, u32),
    pub timeline_size: (u32, u32),
    pub words_size: (u32, u32),
    /// Room left of horizontal bars for category names
    pub category_label_area: u32,
    pub age_color: RGBColor,
    pub education_color: RGBColor,
    pub word_color: RGBColor,
    pub line_color: RGBColor,
    pub sex_palette: Vec<RGBColor>,
    pub marital_palette: Vec<RGBColor>,
    pub region_palette: Vec<RGBColor>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            title_size: 32,
            caption_size: 24,
            label_size: 14,
            demographics_size: (1500, 1200),
            geography_size: (1200, 600),
            timeline_size: (1400, 600),
            words_size: (1200, 800),
            category_label_area: 220,
            age_color: RGBColor(135, 206, 235),
            education_color: RGBColor(144, 238, 144),
            word_color: RGBColor(46, 134, 171),
            line_color: RGBColor(106, 5, 114),
            sex_palette: vec![
                RGBColor(0x33, 0x12, 0x12),
                RGBColor(0x4E, 0xCD, 0xC4),
                RGBColor(0x95, 0xA5, 0xA6),
            ],
            marital_palette: vec![
                RGBColor(0xFF, 0x9F, 0xF3),
                RGBColor(0xF3, 0x68, 0xE0),
                RGBColor(0xFF, 0x9F, 0x43),
                RGBColor(0x10, 0xAC, 0x84),
                RGBColor(0x54, 0xA0, 0xFF),
                RGBColor(0x5F, 0x27, 0xCD),
            ],
            region_palette: vec![
                RGBColor(141, 211, 199),
                RGBColor(255, 255, 179),
                RGBColor(190, 186, 218),
                RGBColor(251, 128, 114),
                RGBColor(128, 177, 211),
                RGBColor(253, 180, 98),
                RGBColor(179, 222, 105),
                RGBColor(252, 205, 229),
                RGBColor(217, 217, 217),
                RGBColor(188, 128, 189),
            ],
        }
    }
}

impl ChartConfig {
    fn font(&self, size: u32) -> FontDesc<'_> {
        (self.font_family.as_str(), size).into_font()
    }
}

/// The chart artifacts, one per report section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chart {
    Demographics,
    Geography,
    Timeline,
    Words,
}

impl Chart {
    pub const ALL: [Chart; 4] = [
        Chart::Demographics,
        Chart::Geography,
        Chart::Timeline,
        Chart::Words,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Chart::Demographics => "perfil_demografico.png",
            Chart::Geography => "distribuicao_geografica.png",
            Chart::Timeline => "evolucao_temporal.png",
            Chart::Words => "palavras_frequentes.png",
        }
    }

    pub fn has_data(self, set: &ChartSet) -> bool {
        match self {
            Chart::Demographics => !set.sex.is_empty(),
            Chart::Geography => !set.regions.is_empty(),
            Chart::Timeline => !set.timeline.is_empty(),
            Chart::Words => !set.words.is_empty(),
        }
    }
}

/// Render every chart that has data into `out_dir`, returning the files written.
/// A chart that fails to render is logged and left out.
pub fn render_all(set: &ChartSet, config: &ChartConfig, out_dir: &Path) -> Vec<PathBuf> {
    let mut produced = Vec::new();

    for chart in Chart::ALL {
        if !chart.has_data(set) {
            info!(chart = chart.file_name(), "no data, chart skipped");
            continue;
        }

        let path = out_dir.join(chart.file_name());
        match render(chart, set, config, &path) {
            Ok(()) => {
                info!(path = %path.display(), "chart written");
                produced.push(path);
            }
            Err(e) => warn!(chart = chart.file_name(), error = %e, "chart rendering failed"),
        }
    }

    produced
}

pub fn render(chart: Chart, set: &ChartSet, config: &ChartConfig, path: &Path) -> Result<()> {
    let drawn = match chart {
        Chart::Demographics => draw_demographics(set, config, path),
        Chart::Geography => draw_geography(&set.regions, config, path),
        Chart::Timeline => draw_timeline(&set.timeline, set.timeline_peak, config, path),
        Chart::Words => draw_words(&set.words, config, path),
    };
    drawn.map_err(|e| Error::Chart(format!("{}: {}", chart.file_name(), e)))
}

fn draw_demographics(set: &ChartSet, config: &ChartConfig, path: &Path) -> DrawResult<()> {
    let root = BitMapBackend::new(path, config.demographics_size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(
        "PERFIL DEMOGRÁFICO DOS PARTICIPANTES",
        config.font(config.title_size),
    )?;

    let panels = root.split_evenly((2, 2));
    draw_pie(&panels[0], &set.sex, &config.sex_palette, config)?;
    draw_vertical_bars(
        &panels[1],
        &set.age_brackets,
        &[config.age_color],
        ("", ""),
        config,
    )?;
    draw_horizontal_bars(&panels[2], &set.education, config.education_color, "", config)?;
    draw_pie(&panels[3], &set.marital_status, &config.marital_palette, config)?;

    root.present()?;
    Ok(())
}

fn draw_geography(series: &ChartSeries, config: &ChartConfig, path: &Path) -> DrawResult<()> {
    let root = BitMapBackend::new(path, config.geography_size).into_drawing_area();
    root.fill(&WHITE)?;
    draw_vertical_bars(
        &root,
        series,
        &config.region_palette,
        ("Estado", "Número de Sugestões"),
        config,
    )?;
    root.present()?;
    Ok(())
}

fn draw_words(series: &ChartSeries, config: &ChartConfig, path: &Path) -> DrawResult<()> {
    let root = BitMapBackend::new(path, config.words_size).into_drawing_area();
    root.fill(&WHITE)?;
    draw_horizontal_bars(&root, series, config.word_color, "Frequência", config)?;
    root.present()?;
    Ok(())
}

fn draw_timeline(
    series: &ChartSeries,
    peak: Option<usize>,
    config: &ChartConfig,
    path: &Path,
) -> DrawResult<()> {
    let root = BitMapBackend::new(path, config.timeline_size).into_drawing_area();
    root.fill(&WHITE)?;

    let last = (series.values.len() as i32 - 1).max(1);
    let y_max = headroom(series.max_value());
    let labels = &series.labels;

    let mut chart = ChartBuilder::on(&root)
        .caption(&series.title, config.font(config.caption_size))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0i32..last, 0u64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|x| {
            usize::try_from(*x)
                .ok()
                .and_then(|i| labels.get(i).cloned())
                .unwrap_or_default()
        })
        .x_desc("Mês/Ano")
        .y_desc("Número de Sugestões")
        .label_style(config.font(config.label_size))
        .draw()?;

    let points: Vec<(i32, u64)> = series
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as i32, v))
        .collect();
    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        config.line_color.stroke_width(2),
    ))?;
    chart.draw_series(
        points
            .iter()
            .map(|&p| Circle::new(p, 5, config.line_color.filled())),
    )?;

    if let Some(&(x, y)) = peak.and_then(|i| points.get(i)) {
        let style = config
            .font(config.label_size + 2)
            .color(&RED)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(std::iter::once(Circle::new((x, y), 7, RED.filled())))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("Pico: {} sugestões", y),
            (x, y + y_max / 20),
            style,
        )))?;
    }

    root.present()?;
    Ok(())
}

fn draw_pie(
    area: &Area<'_>,
    series: &ChartSeries,
    palette: &[RGBColor],
    config: &ChartConfig,
) -> DrawResult<()> {
    let area = area.titled(&series.title, config.font(config.caption_size))?;
    if series.values.iter().all(|&v| v == 0) || palette.is_empty() {
        return Ok(());
    }

    let (width, height) = area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.35;
    let sizes: Vec<f64> = series.values.iter().map(|&v| v as f64).collect();
    let colors: Vec<RGBColor> = (0..sizes.len())
        .map(|i| palette[i % palette.len()])
        .collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &series.labels);
    pie.start_angle(-90.0);
    pie.label_style(config.font(config.label_size));
    pie.percentages(config.font(config.label_size).color(&BLACK));
    area.draw(&pie)?;
    Ok(())
}

fn draw_vertical_bars(
    area: &Area<'_>,
    series: &ChartSeries,
    palette: &[RGBColor],
    (x_desc, y_desc): (&str, &str),
    config: &ChartConfig,
) -> DrawResult<()> {
    let n = series.values.len() as u32;
    let labels = &series.labels;

    let mut chart = ChartBuilder::on(area)
        .caption(&series.title, config.font(config.caption_size))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..n).into_segmented(), 0u64..headroom(series.max_value()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|v| segment_label(labels, v, None))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .label_style(config.font(config.label_size))
        .draw()?;

    chart.draw_series(series.values.iter().enumerate().map(|(i, &v)| {
        let color = palette.get(i % palette.len().max(1)).copied().unwrap_or(BLUE);
        let i = i as u32;
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), v)],
            color.filled(),
        );
        bar.set_margin(0, 0, 5, 5);
        bar
    }))?;

    let style = TextStyle::from(config.font(config.label_size))
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(
        series
            .values
            .iter()
            .enumerate()
            .filter(|(_, &v)| v > 0)
            .map(|(i, &v)| {
                Text::new(
                    thousands(v),
                    (SegmentValue::CenterOf(i as u32), v),
                    style.clone(),
                )
            }),
    )?;
    Ok(())
}

/// Bars grow rightwards; the first entry of `series` is drawn at the top
fn draw_horizontal_bars(
    area: &Area<'_>,
    series: &ChartSeries,
    color: RGBColor,
    x_desc: &str,
    config: &ChartConfig,
) -> DrawResult<()> {
    let n = series.values.len() as u32;
    let labels = &series.labels;

    let mut chart = ChartBuilder::on(area)
        .caption(&series.title, config.font(config.caption_size))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(config.category_label_area)
        .build_cartesian_2d(0u64..headroom(series.max_value()), (0u32..n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(labels.len())
        .y_label_formatter(&|v| segment_label(labels, v, Some(n)))
        .x_desc(x_desc)
        .label_style(config.font(config.label_size))
        .draw()?;

    chart.draw_series(series.values.iter().enumerate().map(|(i, &v)| {
        let row = n - 1 - i as u32;
        let mut bar = Rectangle::new(
            [(0, SegmentValue::Exact(row)), (v, SegmentValue::Exact(row + 1))],
            color.filled(),
        );
        bar.set_margin(5, 5, 0, 0);
        bar
    }))?;

    let style = TextStyle::from(config.font(config.label_size))
        .pos(Pos::new(HPos::Left, VPos::Center));
    chart.draw_series(series.values.iter().enumerate().map(|(i, &v)| {
        let row = n - 1 - i as u32;
        Text::new(
            format!(" {}", v),
            (v, SegmentValue::CenterOf(row)),
            style.clone(),
        )
    }))?;
    Ok(())
}

/// Category name for a segment. With `reversed_len`, segment 0 is the last label.
fn segment_label(
    labels: &[String],
    value: &SegmentValue<u32>,
    reversed_len: Option<u32>,
) -> String {
    let idx = match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => *i,
        SegmentValue::Last => return String::new(),
    };
    let idx = match reversed_len {
        Some(n) if idx < n => n - 1 - idx,
        Some(_) => return String::new(),
        None => idx,
    };
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Upper bound for a value axis, leaving room for bar labels
fn headroom(max: u64) -> u64 {
    max + max / 10 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: Vec<u64>) -> ChartSeries {
        ChartSeries {
            title: "t".to_string(),
            labels: values.iter().map(|v| format!("L{}", v)).collect(),
            values,
        }
    }

    fn chart_set(timeline: Vec<u64>, words: Vec<u64>) -> ChartSet {
        ChartSet {
            sex: series(vec![2, 1]),
            age_brackets: series(vec![0; 8]),
            education: series(vec![3]),
            marital_status: series(vec![3]),
            regions: series(vec![3]),
            timeline: series(timeline),
            timeline_peak: None,
            words: series(words),
        }
    }

    #[test]
    fn test_file_names_are_distinct() {
        let names: Vec<&str> = Chart::ALL.iter().map(|c| c.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "perfil_demografico.png",
                "distribuicao_geografica.png",
                "evolucao_temporal.png",
                "palavras_frequentes.png",
            ]
        );
    }

    #[test]
    fn test_has_data_skips_empty_series() {
        let set = chart_set(Vec::new(), vec![4, 2]);
        assert!(Chart::Demographics.has_data(&set));
        assert!(!Chart::Timeline.has_data(&set));
        assert!(Chart::Words.has_data(&set));
    }

    #[test]
    fn test_render_all_writes_nothing_without_data() {
        let mut set = chart_set(Vec::new(), Vec::new());
        set.sex = series(Vec::new());
        set.regions = series(Vec::new());
        let dir = tempfile::tempdir().unwrap();

        let produced = render_all(&set, &ChartConfig::default(), dir.path());
        assert!(produced.is_empty());
    }

    #[test]
    fn test_segment_label() {
        let labels = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(segment_label(&labels, &SegmentValue::CenterOf(1), None), "b");
        assert_eq!(segment_label(&labels, &SegmentValue::Exact(0), Some(3)), "c");
        assert_eq!(segment_label(&labels, &SegmentValue::CenterOf(2), Some(3)), "a");
        assert_eq!(segment_label(&labels, &SegmentValue::Last, None), "");
        assert_eq!(segment_label(&labels, &SegmentValue::CenterOf(7), None), "");
    }

    #[test]
    fn test_headroom() {
        assert_eq!(headroom(0), 1);
        assert_eq!(headroom(100), 111);
    }

    #[test]
    fn test_default_palettes_cover_displayed_categories() {
        let config = ChartConfig::default();
        assert!(config.sex_palette.len() >= 3);
        assert_eq!(config.marital_palette.len(), crate::types::DEFAULT_MARITAL_TOP);
        assert_eq!(config.region_palette.len(), crate::types::DEFAULT_REGION_CHART_TOP);
    }
}
