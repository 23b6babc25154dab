//! Scripted demo sessions.
//!
//! The demo binary replays a JSON script: a sequence of output blocks that
//! become panes in the canvas. Live blocks turn into growable
//! [`TextPane`]s, captured blocks into read-only [`FramePane`]s.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::pane::{FramePane, Pane, TextPane};

/// One block of a scripted session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptBlock {
    /// Live, growable output; fed through the terminal parser.
    Output { text: String },
    /// Captured read-only frame.
    Frame {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        text: String,
    },
}

/// A full scripted session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionScript {
    /// Pixel height of one text row; the demo uses 1 so pixel math and
    /// terminal rows coincide.
    #[serde(default = "default_row_height")]
    pub row_height_px: usize,
    pub blocks: Vec<ScriptBlock>,
}

fn default_row_height() -> usize {
    1
}

impl SessionScript {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid session script")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Build the block panes in script order.
    pub fn build_panes(&self) -> Vec<Box<dyn Pane>> {
        self.blocks
            .iter()
            .map(|block| -> Box<dyn Pane> {
                match block {
                    ScriptBlock::Output { text } => {
                        let mut pane = TextPane::new(self.row_height_px);
                        pane.feed(text.as_bytes());
                        Box::new(pane)
                    }
                    ScriptBlock::Frame { title, text } => {
                        Box::new(FramePane::new(title.clone(), text, self.row_height_px))
                    }
                }
            })
            .collect()
    }

    /// Synthetic session used when no script file is given.
    pub fn sample() -> Self {
        let mut blocks = Vec::new();
        for n in 0..12 {
            let mut text = format!("$ run step {n}\n");
            for line in 0..(6 + (n * 7) % 23) {
                text.push_str(&format!("step {n}: output line {line}\n"));
            }
            if n % 3 == 0 {
                blocks.push(ScriptBlock::Frame {
                    title: Some(format!("step {n}")),
                    text,
                });
            } else {
                blocks.push(ScriptBlock::Output { text });
            }
        }
        Self {
            row_height_px: 1,
            blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_block_kinds() {
        let script = SessionScript::from_json_str(
            r#"{
                "blocks": [
                    {"kind": "output", "text": "hello\n"},
                    {"kind": "frame", "title": "ls", "text": "a\nb"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(script.row_height_px, 1);
        assert_eq!(script.blocks.len(), 2);

        let panes = script.build_panes();
        assert_eq!(panes.len(), 2);
        // Output pane: "hello" plus the trailing empty line.
        assert_eq!(panes[0].virtual_height(), 2);
        assert_eq!(panes[1].virtual_height(), 2);
    }

    #[test]
    fn rejects_malformed_scripts() {
        assert!(SessionScript::from_json_str("{\"blocks\": 3}").is_err());
    }

    #[test]
    fn sample_session_is_nonempty() {
        let script = SessionScript::sample();
        assert!(script.blocks.len() >= 10);
        assert!(script
            .build_panes()
            .iter()
            .all(|pane| pane.virtual_height() > 0));
    }
}
