use crate::foundation::core::Viewport;

/// Layout parameters for the decorative background grid.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Viewport width below which the compact cell size applies.
    pub compact_below_width: f64,
    /// Cell edge length on narrow viewports.
    pub compact_cell: f64,
    /// Cell edge length on wide viewports.
    pub wide_cell: f64,
    /// Overscan factor applied to the visible cell count.
    pub overscan: f64,
    /// Every `keyword_every`-th cell shows a keyword instead of the icon.
    pub keyword_every: usize,
    /// Keywords cycled by cell index.
    pub keywords: Vec<String>,
    /// Resting opacity of every cell.
    pub cell_opacity: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            compact_below_width: 768.0,
            compact_cell: 80.0,
            wide_cell: 120.0,
            overscan: 1.2,
            keyword_every: 13,
            keywords: vec!["EPIC".to_owned(), "CRAZY".to_owned(), "UNIQUE".to_owned()],
            cell_opacity: 0.2,
        }
    }
}

/// What a grid cell displays.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum CellContent {
    Keyword(String),
    Icon,
}

/// One background grid cell.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct GridCell {
    pub index: usize,
    pub content: CellContent,
    pub opacity: f64,
}

/// Lay out enough cells to cover `viewport`, with overscan.
pub fn layout_grid(viewport: Viewport, cfg: &GridConfig) -> Vec<GridCell> {
    let cell = if viewport.width < cfg.compact_below_width {
        cfg.compact_cell
    } else {
        cfg.wide_cell
    };
    if cell <= 0.0 {
        return Vec::new();
    }
    let cols = (viewport.width / cell).ceil();
    let rows = (viewport.height / cell).ceil();
    let count = (cols * rows * cfg.overscan).ceil().max(0.0) as usize;

    (0..count)
        .map(|index| {
            let content = match cfg.keywords.len() {
                n if n > 0 && cfg.keyword_every > 0 && index % cfg.keyword_every == 0 => {
                    CellContent::Keyword(cfg.keywords[index % n].clone())
                }
                _ => CellContent::Icon,
            };
            GridCell {
                index,
                content,
                opacity: cfg.cell_opacity,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/grid.rs"]
mod tests;
