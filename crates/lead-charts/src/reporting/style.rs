//! Presentation settings handed to the rendering collaborator.
//!
//! Nothing in the pipeline reads these; they travel with the report so every
//! front end draws the charts the same way.

use crate::types::ChartKind;
use serde::{Deserialize, Serialize};

/// Sequential palette used for every chart (Plasma).
pub const PLASMA: [&str; 10] = [
    "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786", "#d8576b", "#ed7953", "#fb9f3a",
    "#fdca26", "#f0f921",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendSpec {
    pub title: String,
    pub x: f64,
    pub y: f64,
    pub background: String,
    pub border_color: String,
    pub border_width: u32,
}

/// Fonts, legend and palette shared by all charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTheme {
    pub text_font: FontSpec,
    pub title_font: FontSpec,
    pub legend: LegendSpec,
    pub palette: Vec<String>,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            text_font: FontSpec {
                family: "Arial, serif".to_string(),
                size: 14,
                color: "white".to_string(),
            },
            title_font: FontSpec {
                family: "Old English Text MT, serif".to_string(),
                size: 24,
                color: "white".to_string(),
            },
            legend: LegendSpec {
                title: "Legenda".to_string(),
                x: 1.0,
                y: 1.0,
                background: "black".to_string(),
                border_color: "white".to_string(),
                border_width: 1,
            },
            palette: PLASMA.iter().map(|c| c.to_string()).collect(),
            width: 1080,
            height: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Categories on the y axis.
    Horizontal,
    Vertical,
}

/// Per-chart axis titles and layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub subtitle: String,
    pub orientation: Orientation,
    pub x_title: String,
    pub y_title: String,
    /// Legend label of the secondary dimension, if the chart has one.
    pub color_label: Option<String>,
}

impl ChartSpec {
    pub fn for_kind(kind: ChartKind) -> Self {
        let (subtitle, orientation, x_title, y_title, color_label) = match kind {
            ChartKind::LeadsBySource => (
                "Leads gerados por origem",
                Orientation::Horizontal,
                "Quantidade",
                "",
                None,
            ),
            ChartKind::StageDistributionBySource => (
                "Distribuição das Etapas por Origem",
                Orientation::Vertical,
                "Origem",
                "Quantidade",
                Some("Etapas do Funil"),
            ),
            ChartKind::PlansBySource => (
                "Distribuição dos Leads por Convênio e Origem",
                Orientation::Horizontal,
                "Quantidade",
                "Convênios",
                Some("Origem dos Leads"),
            ),
            ChartKind::PlansByCommissionBand => (
                "Quantidade de Leads por Convênio (Segmentado pela Comissão)",
                Orientation::Horizontal,
                "Quantidade",
                "Convênios",
                Some("Faixa de Comissão"),
            ),
        };

        Self {
            kind,
            subtitle: subtitle.to_string(),
            orientation,
            x_title: x_title.to_string(),
            y_title: y_title.to_string(),
            color_label: color_label.map(str::to_string),
        }
    }

    /// Specs for every chart, in [`ChartKind::ALL`] order.
    pub fn all() -> Vec<ChartSpec> {
        ChartKind::ALL.iter().map(|k| Self::for_kind(*k)).collect()
    }
}
