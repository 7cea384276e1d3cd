use crate::core::engine::{FloodRiskEngine, Location};
use crate::domain::model::RiskAssessment;
use crate::domain::ports::Geocoder;
use crate::utils::error::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const PROMPT: &str = "Enter address: ";
pub const INVALID_ADDRESS: &str = "Invalid address. Please enter a valid address.";

/// 互動式詢問地址，直到有一個地址能完成評估
pub struct InteractiveSession<'a, G: Geocoder> {
    engine: &'a FloodRiskEngine<G>,
    country_name: String,
    json: bool,
}

impl<'a, G: Geocoder> InteractiveSession<'a, G> {
    pub fn new(engine: &'a FloodRiskEngine<G>, country_name: impl Into<String>, json: bool) -> Self {
        Self {
            engine,
            country_name: country_name.into(),
            json,
        }
    }

    pub fn outside_border_message(&self) -> String {
        format!(
            "Address is not within {}. Please enter a valid address.",
            self.country_name
        )
    }

    /// Prompts until one address is assessed. Returns `Ok(None)` when the
    /// input ends first.
    pub async fn run<R, W>(&self, mut input: R, output: &mut W) -> Result<Option<RiskAssessment>>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut line = String::new();
        loop {
            write!(output, "{}", PROMPT)?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line).await? == 0 {
                writeln!(output)?;
                tracing::info!("👋 Input closed before an address was assessed");
                return Ok(None);
            }

            if let Some(assessment) = self.try_address(line.trim(), output).await? {
                return Ok(Some(assessment));
            }
        }
    }

    /// 單次模式：地址無效時只印出訊息，不再詢問
    pub async fn assess_once<W: Write>(
        &self,
        address: &str,
        output: &mut W,
    ) -> Result<Option<RiskAssessment>> {
        self.try_address(address.trim(), output).await
    }

    async fn try_address<W: Write>(
        &self,
        address: &str,
        output: &mut W,
    ) -> Result<Option<RiskAssessment>> {
        if address.is_empty() {
            writeln!(output, "{}", INVALID_ADDRESS)?;
            return Ok(None);
        }

        let coordinates = match self.engine.locate(address).await? {
            Location::Found(coordinates) => coordinates,
            Location::NotFound => {
                writeln!(output, "{}", INVALID_ADDRESS)?;
                return Ok(None);
            }
            Location::OutsideBorder(_) => {
                writeln!(output, "{}", self.outside_border_message())?;
                return Ok(None);
            }
        };

        match self.engine.assess(address, coordinates) {
            Ok(assessment) => {
                self.report(&assessment, output)?;
                Ok(Some(assessment))
            }
            Err(e) if e.is_recoverable() => {
                tracing::warn!("⚠️ Cannot assess '{}': {}", address, e);
                writeln!(
                    output,
                    "{} Please enter a different address.",
                    e.user_friendly_message()
                )?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn report<W: Write>(&self, assessment: &RiskAssessment, output: &mut W) -> Result<()> {
        if self.json {
            serde_json::to_writer_pretty(&mut *output, assessment)?;
            writeln!(output)?;
        } else {
            writeln!(output, "{}", assessment.summary())?;
        }
        output.flush()?;
        Ok(())
    }
}
