use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;

use crate::aggregate::{DemographicProfile, RegionRanking};
use crate::error::LoadError;
use crate::pipeline::AnalysisReport;
use crate::stats::{FrequencyEntry, FrequencyTable};
use crate::types::{AnalysisOptions, Dataset};

const RULE_WIDTH: usize = 50;
const SUMMARY_RULE_WIDTH: usize = 60;
const PREVIEW_CELL_WIDTH: usize = 30;

/// Headline figures for the closing section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: u64,
    pub male: u64,
    pub male_percent: f64,
    pub female: u64,
    pub female_percent: f64,
    pub not_informed_sex: u64,
    pub most_engaged_region: Option<String>,
    pub most_engaged_region_count: u64,
    pub predominant_age_bracket: Option<String>,
}

pub fn build_summary(demographics: &DemographicProfile, geography: &RegionRanking) -> Summary {
    let shares = &demographics.shares;
    let top_region = geography.most_engaged();
    Summary {
        total: shares.total,
        male: shares.male,
        male_percent: shares.male_percent,
        female: shares.female,
        female_percent: shares.female_percent,
        not_informed_sex: shares.not_informed,
        most_engaged_region: top_region.map(|e| e.label.clone()),
        most_engaged_region_count: top_region.map_or(0, |e| e.count),
        predominant_age_bracket: demographics.predominant_age_bracket.clone(),
    }
}

/// Labels and values for one chart, in display order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

impl ChartSeries {
    fn from_table(title: &str, table: &FrequencyTable) -> Self {
        Self {
            title: title.to_string(),
            labels: table.labels(),
            values: table.counts(),
        }
    }

    fn from_entries(title: &str, entries: &[FrequencyEntry]) -> Self {
        Self {
            title: title.to_string(),
            labels: entries.iter().map(|e| e.label.clone()).collect(),
            values: entries.iter().map(|e| e.count).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn max_value(&self) -> u64 {
        self.values.iter().copied().max().unwrap_or(0)
    }
}

/// Everything the chart renderer draws
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub sex: ChartSeries,
    pub age_brackets: ChartSeries,
    pub education: ChartSeries,
    pub marital_status: ChartSeries,
    pub regions: ChartSeries,
    pub timeline: ChartSeries,
    /// Index of the peak month within `timeline`
    pub timeline_peak: Option<usize>,
    pub words: ChartSeries,
}

pub fn chart_series(report: &AnalysisReport) -> ChartSet {
    let demographics = &report.demographics;
    let options = &report.options;

    let timeline = ChartSeries {
        title: "EVOLUÇÃO TEMPORAL DAS SUGESTÕES".to_string(),
        labels: report
            .timeline
            .months
            .iter()
            .map(|m| m.month.to_string())
            .collect(),
        values: report.timeline.months.iter().map(|m| m.count).collect(),
    };
    let timeline_peak = report
        .timeline
        .peak
        .and_then(|peak| report.timeline.months.iter().position(|m| m.month == peak.month));

    ChartSet {
        sex: ChartSeries::from_table("Distribuição por Sexo", &demographics.sex),
        age_brackets: ChartSeries::from_table(
            "Distribuição por Faixa Etária",
            &demographics.age_brackets,
        ),
        education: ChartSeries::from_entries(
            "Distribuição por Escolaridade",
            demographics.education.top(options.education_top),
        ),
        marital_status: ChartSeries::from_entries(
            "Distribuição por Estado Civil",
            demographics.marital_status.top(options.marital_top),
        ),
        regions: ChartSeries::from_entries(
            &format!("TOP {} ESTADOS COM MAIS SUGESTÕES", options.region_chart_top),
            report.geography.top(options.region_chart_top),
        ),
        timeline,
        timeline_peak,
        words: ChartSeries::from_entries(
            &format!(
                "{} PALAVRAS MAIS FREQUENTES NAS SUGESTÕES",
                options.word_chart_top
            ),
            report.content.words.top(options.word_chart_top),
        ),
    }
}

/// Group digits with commas: 12345 -> "12,345"
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn section(out: &mut impl Write, title: &str, underline: char) -> io::Result<()> {
    writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", underline.to_string().repeat(RULE_WIDTH))
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let head: String = value.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

/// Console text for one completed run
pub struct ConsoleReport<'a> {
    pub dataset: &'a Dataset,
    pub report: &'a AnalysisReport,
    /// Chart files actually written
    pub charts: &'a [PathBuf],
}

impl ConsoleReport<'_> {
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        write_load_summary(out, self.dataset)?;
        self.write_preliminary(out)?;
        self.write_demographics(out)?;
        self.write_geography(out)?;
        self.write_timeline(out)?;
        self.write_content(out)?;
        self.write_summary(out)?;
        writeln!(out, "\n🎉 ANÁLISE CONCLUÍDA COM SUCESSO!")?;
        if !self.charts.is_empty() {
            writeln!(out, "📁 Os gráficos foram salvos como arquivos PNG")?;
        }
        Ok(())
    }

    fn options(&self) -> &AnalysisOptions {
        &self.report.options
    }

    fn write_preliminary(&self, out: &mut impl Write) -> io::Result<()> {
        section(out, "📋 ANÁLISE PRELIMINAR", '_')?;

        let preview_rows = self.options().preview_rows.min(self.dataset.row_count());
        writeln!(out, "\n🔍 Primeiras {} linhas:", preview_rows)?;
        for row in 0..preview_rows {
            let cells: Vec<String> = (0..self.dataset.column_count())
                .map(|col| {
                    self.dataset
                        .cell(row, col)
                        .map_or_else(|| "NaN".to_string(), |v| truncate(&v, PREVIEW_CELL_WIDTH))
                })
                .collect();
            writeln!(out, "  {:>3} | {}", row, cells.join(" | "))?;
        }

        writeln!(out, "\n📝 Colunas disponíveis:")?;
        for (i, column) in self.dataset.columns().iter().enumerate() {
            writeln!(out, "  {:2}. {}", i + 1, column.name)?;
        }

        writeln!(out, "\n📉 Valores faltantes:")?;
        for column in &self.report.missing.columns {
            writeln!(
                out,
                "  • {}: {} ({:.1}%)",
                column.name, column.missing, column.percent
            )?;
        }
        Ok(())
    }

    fn write_demographics(&self, out: &mut impl Write) -> io::Result<()> {
        section(out, "👥 ANÁLISE DEMOGRÁFICA", '=')?;
        let shares = &self.report.demographics.shares;
        writeln!(out, "\n📊 ESTATÍSTICAS DETALHADAS:")?;
        writeln!(
            out,
            "• Homens: {} ({:.1}%)",
            thousands(shares.male),
            shares.male_percent
        )?;
        writeln!(
            out,
            "• Mulheres: {} ({:.1}%)",
            thousands(shares.female),
            shares.female_percent
        )?;
        writeln!(
            out,
            "• Sexo não informado: {}",
            thousands(shares.not_informed)
        )
    }

    fn write_geography(&self, out: &mut impl Write) -> io::Result<()> {
        section(out, "🗺️ ANÁLISE GEOGRÁFICA", '=')?;
        writeln!(
            out,
            "\n🏆 TOP {} ESTADOS MAIS ENGAJADOS:",
            self.options().region_highlight_top
        )?;
        for (i, share) in self.report.geography.highlights.iter().enumerate() {
            writeln!(
                out,
                "  {}. {}: {} sugestões ({:.1}%)",
                i + 1,
                share.region,
                thousands(share.count),
                share.percent
            )?;
        }
        Ok(())
    }

    fn write_timeline(&self, out: &mut impl Write) -> io::Result<()> {
        section(out, "📅 ANÁLISE TEMPORAL", '=')?;
        match self.report.timeline.peak {
            Some(peak) => writeln!(
                out,
                "📈 Mês com mais sugestões: {} ({} sugestões)",
                peak.month, peak.count
            ),
            None => writeln!(out, "📈 Nenhuma data válida encontrada"),
        }
    }

    fn write_content(&self, out: &mut impl Write) -> io::Result<()> {
        section(out, "📝 ANÁLISE DE CONTEÚDO", '=')?;
        writeln!(
            out,
            "\n🔤 TOP {} PALAVRAS-CHAVE:",
            self.options().word_list_top
        )?;
        if self.report.content.words.is_empty() {
            writeln!(out, "  (nenhuma palavra encontrada)")?;
        }
        for (i, entry) in self
            .report
            .content
            .words
            .top(self.options().word_list_top)
            .iter()
            .enumerate()
        {
            writeln!(
                out,
                "  {}. {}: {} ocorrências",
                i + 1,
                entry.label.to_uppercase(),
                entry.count
            )?;
        }
        Ok(())
    }

    fn write_summary(&self, out: &mut impl Write) -> io::Result<()> {
        let summary = &self.report.summary;
        writeln!(out, "\n{}", "=".repeat(SUMMARY_RULE_WIDTH))?;
        writeln!(out, "📊 RESUMO FINAL DA ANÁLISE")?;
        writeln!(out, "{}", "=".repeat(SUMMARY_RULE_WIDTH))?;

        writeln!(out, "\n🎯 PRINCIPAIS ESTATÍSTICAS:")?;
        writeln!(
            out,
            "  • Total de sugestões analisadas: {}",
            thousands(summary.total)
        )?;
        writeln!(
            out,
            "  • Participação masculina: {} ({:.1}%)",
            thousands(summary.male),
            summary.male_percent
        )?;
        writeln!(
            out,
            "  • Participação feminina: {} ({:.1}%)",
            thousands(summary.female),
            summary.female_percent
        )?;
        if let Some(region) = &summary.most_engaged_region {
            writeln!(
                out,
                "  • Estado mais engajado: {} ({} sugestões)",
                region,
                thousands(summary.most_engaged_region_count)
            )?;
        }
        if let Some(bracket) = &summary.predominant_age_bracket {
            writeln!(out, "  • Faixa etária predominante: {}", bracket)?;
        }

        writeln!(out, "\n📈 GRÁFICOS GERADOS:")?;
        if self.charts.is_empty() {
            writeln!(out, "  (nenhum)")?;
        }
        for chart in self.charts {
            let name = chart
                .file_name()
                .map_or_else(|| chart.display().to_string(), |n| n.to_string_lossy().into_owned());
            writeln!(out, "  ✅ {}", name)?;
        }
        Ok(())
    }
}

pub fn write_banner(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "🔍 ANALISANDO DADOS DA CONSTITUINTE DE 1986")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

pub fn write_load_summary(out: &mut impl Write, dataset: &Dataset) -> io::Result<()> {
    writeln!(out, "✅ Dataset carregado com sucesso!")?;
    writeln!(
        out,
        "📊 Total de registros: {}",
        thousands(dataset.row_count() as u64)
    )?;
    writeln!(out, "📈 Total de colunas: {}", dataset.column_count())
}

pub fn write_load_failure(out: &mut impl Write, err: &LoadError) -> io::Result<()> {
    match err {
        LoadError::NotFound(path) => {
            writeln!(out, "❌ Arquivo '{}' não encontrado!", path.display())?;
            writeln!(
                out,
                "📁 Certifique-se de que o arquivo está no caminho informado"
            )?;
        }
        other => writeln!(out, "❌ Erro ao carregar dados: {}", other)?,
    }
    writeln!(
        out,
        "❌ Não foi possível carregar os dados. Verifique o arquivo CSV."
    )
}
