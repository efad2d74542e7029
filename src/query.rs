//! Line-oriented guessing game over a trained model.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::classifier::Model;
use crate::constants::query::{FAREWELL, PREDICTION_PREFIX, PROMPT, QUIT_COMMAND};
use crate::data::{DisplayName, PartnerId};
use crate::errors::AnalyzerError;

/// Summary of a finished session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuerySession {
    /// Lines classified before the session ended.
    pub predictions: usize,
    /// True when the session ended on `quit` rather than end of input.
    pub quit: bool,
}

/// Reads texts, answers with the most likely partner, stops on `quit` or EOF.
pub struct QueryLoop<'a> {
    model: &'a Model,
    display_names: HashMap<PartnerId, DisplayName>,
}

impl<'a> QueryLoop<'a> {
    /// Create a loop over `model`; predictions are labelled with `display_names`
    /// when a partner has one.
    pub fn new(model: &'a Model, display_names: HashMap<PartnerId, DisplayName>) -> Self {
        Self {
            model,
            display_names,
        }
    }

    /// Run until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(
        &self,
        mut input: R,
        mut output: W,
    ) -> Result<QuerySession, AnalyzerError> {
        let mut session = QuerySession::default();
        let mut line = String::new();
        loop {
            write!(output, "{PROMPT}")?;
            output.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }
            let text = line.trim();
            if text == QUIT_COMMAND {
                session.quit = true;
                break;
            }
            let prediction = self.model.predict(text)?;
            debug!(
                "[parley:query] {:?} -> {} ({:.4})",
                text, prediction.partner_id, prediction.log_posterior
            );
            writeln!(output, "{PREDICTION_PREFIX}{}", self.label(&prediction.partner_id))?;
            session.predictions += 1;
        }
        writeln!(output, "{FAREWELL}")?;
        output.flush()?;
        info!(
            "[parley:query] session ended after {} prediction(s)",
            session.predictions
        );
        Ok(session)
    }

    fn label(&self, partner_id: &str) -> String {
        match self.display_names.get(partner_id) {
            Some(name) if name != partner_id => format!("{name} ({partner_id})"),
            _ => partner_id.to_string(),
        }
    }
}
