//! Cached garden state for one logged-in user.

use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::debug;

use boostme_core::api::{
    ChallengeProgressResponse, GardenUpdate, HarvestResponse, LessonCompleteResponse,
    MyGardenResponse, PlantResponse, SetThemeResponse, WaterGardenResponse, WaterPlantResponse,
};
use boostme_core::garden::{GardenView, PlantType, PlantView, Position};
use boostme_core::{ChallengeId, LessonId, PlantId, PlantTypeId};

use crate::client::GardenClient;
use crate::error::{ClientError, Result};

/// The last known garden, plants, and plant catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GardenSnapshot {
    pub garden: GardenView,
    pub plants: Vec<PlantView>,
    pub plant_types: Vec<PlantType>,
}

impl From<MyGardenResponse> for GardenSnapshot {
    fn from(response: MyGardenResponse) -> Self {
        Self {
            garden: response.garden,
            plants: response.plants,
            plant_types: response.plant_types,
        }
    }
}

impl GardenSnapshot {
    #[must_use]
    pub fn plant(&self, id: PlantId) -> Option<&PlantView> {
        self.plants.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn plant_type(&self, id: PlantTypeId) -> Option<&PlantType> {
        self.plant_types.iter().find(|t| t.id == id)
    }

    /// Plant types the garden level allows planting.
    pub fn plantable_types(&self) -> impl Iterator<Item = &PlantType> {
        let level = self.garden.level;
        self.plant_types
            .iter()
            .filter(move |t| t.unlock_level <= level)
    }

    fn apply_update(&mut self, update: &GardenUpdate) {
        self.garden = update.garden.clone();
    }

    fn upsert_plant(&mut self, plant: &PlantView) {
        match self.plants.iter_mut().find(|p| p.id == plant.id) {
            Some(existing) => *existing = plant.clone(),
            None => self.plants.push(plant.clone()),
        }
    }

    fn remove_plant(&mut self, id: PlantId) {
        self.plants.retain(|p| p.id != id);
    }

    fn apply_planted(&mut self, response: &PlantResponse) {
        self.upsert_plant(&response.plant);
        self.apply_update(&response.update);
    }

    fn apply_watered(&mut self, response: &WaterPlantResponse) {
        self.upsert_plant(&response.plant);
        self.apply_update(&response.update);
    }

    fn apply_garden_watered(&mut self, response: &WaterGardenResponse) {
        self.plants.clone_from(&response.plants);
        self.apply_update(&response.update);
    }

    fn apply_harvested(&mut self, response: &HarvestResponse) {
        self.remove_plant(response.harvested_plant_id);
        self.apply_update(&response.update);
    }
}

/// A logged-in user's garden, kept in step with the server.
///
/// Every mutation sends one request and merges the entities the server
/// returns into the snapshot. Only one mutation runs at a time; a second one
/// started meanwhile fails with [`ClientError::Busy`] instead of queueing.
pub struct GardenSession {
    client: GardenClient,
    snapshot: RwLock<Option<GardenSnapshot>>,
    in_flight: Mutex<()>,
}

impl GardenSession {
    /// Wrap a client that is already logged in. No request is made until
    /// [`refresh`](Self::refresh).
    #[must_use]
    pub fn new(client: GardenClient) -> Self {
        Self {
            client,
            snapshot: RwLock::new(None),
            in_flight: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn client(&self) -> &GardenClient {
        &self.client
    }

    /// The cached snapshot, `None` before the first refresh.
    pub async fn snapshot(&self) -> Option<GardenSnapshot> {
        self.snapshot.read().await.clone()
    }

    /// Replace the snapshot with `GET /garden/my-garden`.
    ///
    /// # Errors
    ///
    /// Returns the client error; the old snapshot is kept.
    pub async fn refresh(&self) -> Result<GardenSnapshot> {
        let fresh = GardenSnapshot::from(self.client.my_garden().await?);
        *self.snapshot.write().await = Some(fresh.clone());
        debug!(plants = fresh.plants.len(), "garden snapshot refreshed");
        Ok(fresh)
    }

    /// Whether a mutation is running right now.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    fn begin(&self) -> Result<MutexGuard<'_, ()>> {
        self.in_flight.try_lock().map_err(|_| ClientError::Busy)
    }

    async fn merge(&self, apply: impl FnOnce(&mut GardenSnapshot)) {
        if let Some(snapshot) = self.snapshot.write().await.as_mut() {
            apply(snapshot);
        }
    }

    /// # Errors
    ///
    /// Returns `ClientError::Busy` if another mutation is running, or the
    /// server's rejection.
    pub async fn plant(
        &self,
        plant_type_id: PlantTypeId,
        position: Option<Position>,
    ) -> Result<PlantResponse> {
        let _guard = self.begin()?;
        let response = self.client.plant(plant_type_id, position).await?;
        self.merge(|s| s.apply_planted(&response)).await;
        Ok(response)
    }

    /// # Errors
    ///
    /// Returns `ClientError::Busy` if another mutation is running, or the
    /// server's rejection.
    pub async fn water_plant(&self, plant_id: PlantId) -> Result<WaterPlantResponse> {
        let _guard = self.begin()?;
        let response = self.client.water_plant(plant_id).await?;
        self.merge(|s| s.apply_watered(&response)).await;
        Ok(response)
    }

    /// # Errors
    ///
    /// Returns `ClientError::Busy` if another mutation is running, or the
    /// server's rejection.
    pub async fn water_garden(&self) -> Result<WaterGardenResponse> {
        let _guard = self.begin()?;
        let response = self.client.water_garden().await?;
        self.merge(|s| s.apply_garden_watered(&response)).await;
        Ok(response)
    }

    /// # Errors
    ///
    /// Returns `ClientError::Busy` if another mutation is running, or the
    /// server's rejection.
    pub async fn harvest(&self, plant_id: PlantId) -> Result<HarvestResponse> {
        let _guard = self.begin()?;
        let response = self.client.harvest(plant_id).await?;
        self.merge(|s| s.apply_harvested(&response)).await;
        Ok(response)
    }

    /// # Errors
    ///
    /// Returns `ClientError::Busy` if another mutation is running, or the
    /// server's rejection.
    pub async fn progress_challenge(
        &self,
        challenge_id: ChallengeId,
        increment: i32,
    ) -> Result<ChallengeProgressResponse> {
        let _guard = self.begin()?;
        let response = self
            .client
            .progress_challenge(challenge_id, increment)
            .await?;
        self.merge(|s| s.apply_update(&response.update)).await;
        Ok(response)
    }

    /// # Errors
    ///
    /// Returns `ClientError::Busy` if another mutation is running, or the
    /// server's rejection.
    pub async fn set_theme(&self, theme: &str) -> Result<SetThemeResponse> {
        let _guard = self.begin()?;
        let response = self.client.set_theme(theme).await?;
        self.merge(|s| s.apply_update(&response.update)).await;
        Ok(response)
    }

    /// # Errors
    ///
    /// Returns `ClientError::Busy` if another mutation is running, or the
    /// server's rejection.
    pub async fn complete_lesson(&self, lesson_id: LessonId) -> Result<LessonCompleteResponse> {
        let _guard = self.begin()?;
        let response = self.client.complete_lesson(lesson_id).await?;
        self.merge(|s| s.apply_update(&response.update)).await;
        Ok(response)
    }
}
