//! A small fluent-builder for the settings the pipeline entry points need: tab width,
//! the source's display name (used in diagnostics), and which stage to stop after.
//!
//! Grounded on `daig-wolfram-parse`'s `ParseOptions` (`src/lib.rs`): a `Default` impl
//! plus consuming `self -> Self` setters, not a `&mut self` builder.

use crate::newtypes::TabWidth;

/// Which pipeline stage to stop after. `None` (the default) runs the whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
    Check,
}

#[derive(Debug, Clone)]
pub struct CompileOptions {
    tab_width: TabWidth,
    filename: String,
    stop_after: Option<Stage>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            tab_width: TabWidth::default(),
            filename: "<input>".to_string(),
            stop_after: None,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab_width(self, tab_width: TabWidth) -> Self {
        CompileOptions { tab_width, ..self }
    }

    pub fn filename(self, filename: impl Into<String>) -> Self {
        CompileOptions {
            filename: filename.into(),
            ..self
        }
    }

    pub fn stop_after(self, stage: Stage) -> Self {
        CompileOptions {
            stop_after: Some(stage),
            ..self
        }
    }

    pub fn tab_width_value(&self) -> TabWidth {
        self.tab_width
    }

    pub fn filename_value(&self) -> &str {
        &self.filename
    }

    pub fn stop_after_stage(&self) -> Option<Stage> {
        self.stop_after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_cli_defaults() {
        let opts = CompileOptions::new();
        assert_eq!(opts.tab_width_value(), TabWidth::default());
        assert_eq!(opts.stop_after_stage(), None);
    }

    #[test]
    fn builder_methods_override_the_defaults() {
        let opts = CompileOptions::new()
            .tab_width(TabWidth::new(4).unwrap())
            .filename("main.scrap")
            .stop_after(Stage::Parse);
        assert_eq!(opts.tab_width_value().get(), 4);
        assert_eq!(opts.filename_value(), "main.scrap");
        assert_eq!(opts.stop_after_stage(), Some(Stage::Parse));
    }
}
