use crate::{
    error::{Result, SketchError},
    gemini::{ImageGenerator, SketchGenerator},
    history::SketchHistory,
    models::{HistoryEntry, SketchRequest},
};

/// A user's working session: one generator plus their history.
///
/// `generate` takes `&mut self`, so a session can never have two
/// generations in flight at once.
pub struct SketchSession<G> {
    generator: SketchGenerator<G>,
    history: SketchHistory,
}

impl<G: ImageGenerator> SketchSession<G> {
    pub fn new(generator: SketchGenerator<G>, history: SketchHistory) -> Self {
        Self { generator, history }
    }

    pub fn history(&self) -> &SketchHistory {
        &self.history
    }

    /// Generates a sketch and records it. History changes only on success.
    ///
    /// Saving the history is best-effort: a storage failure is logged and the
    /// generated entry is still returned.
    pub async fn generate(&mut self, request: &SketchRequest) -> Result<HistoryEntry> {
        request.validate()?;
        let image = self.generator.generate(request).await?;
        let entry = HistoryEntry::new(self.history.next_id(), request, image.to_data_uri());
        if let Err(e) = self.history.push(entry.clone()).await {
            log::warn!("⚠️  Sketch {} generated but history was not saved: {}", entry.id, e);
        }
        Ok(entry)
    }

    /// The inputs of a past entry, for editing or generating again.
    pub fn select(&self, id: i64) -> Result<SketchRequest> {
        self.history
            .get(id)
            .map(HistoryEntry::to_request)
            .ok_or_else(|| SketchError::InvalidInput(format!("no history entry with id {}", id)))
    }

    pub async fn clear_history(&mut self) -> Result<()> {
        self.history.clear().await
    }
}
