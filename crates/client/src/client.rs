//! HTTP client for the garden API.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use boostme_core::api::{
    AuthResponse, ChallengeProgressRequest, ChallengeProgressResponse, Course, ErrorBody,
    HarvestResponse, Lesson, LessonCompleteResponse, LoginRequest, LogoutResponse,
    MyGardenResponse, PlantRequest, PlantResponse, RegisterRequest, SetThemeRequest,
    SetThemeResponse, UserResponse, WaterGardenResponse, WaterPlantResponse,
};
use boostme_core::garden::{
    AchievementView, DailyChallenge, GardenActivity, GardenStats, PlantType, Position, ThemeView,
};
use boostme_core::{ChallengeId, CourseId, LessonId, PlantId, PlantTypeId};

use crate::error::{ClientError, Result};

/// API base URL when `BOOSTME_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Client for the BoostMe API.
///
/// Holds a cookie store, so logging in once authenticates every later call
/// made through the same client (or its clones). Requests are not retried.
#[derive(Clone)]
pub struct GardenClient {
    inner: Arc<GardenClientInner>,
}

struct GardenClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl GardenClient {
    /// Create a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the HTTP client cannot be built.
    pub fn new(mut base_url: Url) -> Result<Self> {
        // Relative joins keep any path prefix only with a trailing slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self {
            inner: Arc::new(GardenClientInner { client, base_url }),
        })
    }

    /// Create a client from `BOOSTME_API_URL`, falling back to
    /// [`DEFAULT_API_URL`].
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Url` if the variable is not a valid URL.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("BOOSTME_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        Self::new(Url::parse(&url)?)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self.inner.client.request(method, self.url(path)?))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = %status, "API request failed");
            return Err(api_error(status, &body));
        }

        Ok(response.json().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::GET, path)?).await
    }

    async fn call<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T> {
        self.send(self.request(method, path)?).await
    }

    async fn call_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(self.request(method, path)?.json(body)).await
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Whether the server answers its liveness check.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the server cannot be reached.
    pub async fn health(&self) -> Result<bool> {
        let response = self.request(Method::GET, "health")?.send().await?;
        Ok(response.status().is_success())
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Create an account. The client is logged in afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 400 for invalid input and 409
    /// if the email is taken.
    #[instrument(skip(self, name, password))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<UserResponse> {
        let body = RegisterRequest {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let response: AuthResponse = self
            .call_json(Method::POST, "api/auth/register", &body)
            .await?;
        Ok(response.user)
    }

    /// Log in and keep the session cookie.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 401 for wrong credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<UserResponse> {
        let body = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let response: AuthResponse = self.call_json(Method::POST, "api/auth/login", &body).await?;
        Ok(response.user)
    }

    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 401 when not logged in.
    pub async fn me(&self) -> Result<UserResponse> {
        let response: AuthResponse = self.get("api/auth/me").await?;
        Ok(response.user)
    }

    /// # Errors
    ///
    /// Returns `ClientError::Http` on transport failure.
    pub async fn logout(&self) -> Result<bool> {
        let response: LogoutResponse = self.call(Method::POST, "api/auth/logout").await?;
        Ok(response.success)
    }

    // =========================================================================
    // Garden
    // =========================================================================

    /// # Errors
    ///
    /// Returns `ClientError::Api` if the request is rejected.
    pub async fn my_garden(&self) -> Result<MyGardenResponse> {
        self.get("garden/my-garden").await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Api` if the request is rejected.
    pub async fn plant_types(&self) -> Result<Vec<PlantType>> {
        self.get("garden/plant-types").await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 409 for too few Star Seeds, a
    /// too-low level, or an occupied position.
    pub async fn plant(
        &self,
        plant_type_id: PlantTypeId,
        position: Option<Position>,
    ) -> Result<PlantResponse> {
        self.call_json(
            Method::POST,
            &format!("garden/plant/{plant_type_id}"),
            &PlantRequest { position },
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 409 while the plant is on
    /// cooldown or already fully grown.
    pub async fn water_plant(&self, plant_id: PlantId) -> Result<WaterPlantResponse> {
        self.call(Method::PUT, &format!("garden/plants/{plant_id}/water"))
            .await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Api` if the request is rejected.
    pub async fn water_garden(&self) -> Result<WaterGardenResponse> {
        self.call(Method::PUT, "garden/water-garden").await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 409 if the plant is not
    /// harvestable.
    pub async fn harvest(&self, plant_id: PlantId) -> Result<HarvestResponse> {
        self.call(Method::POST, &format!("garden/plants/{plant_id}/harvest"))
            .await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Api` if the request is rejected.
    pub async fn achievements(&self) -> Result<Vec<AchievementView>> {
        self.get("garden/achievements").await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Api` if the request is rejected.
    pub async fn challenges_today(&self) -> Result<Vec<DailyChallenge>> {
        self.get("garden/challenges/today").await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 400 for a non-positive
    /// increment.
    pub async fn progress_challenge(
        &self,
        challenge_id: ChallengeId,
        increment: i32,
    ) -> Result<ChallengeProgressResponse> {
        self.call_json(
            Method::PUT,
            &format!("garden/challenges/{challenge_id}/progress"),
            &ChallengeProgressRequest { increment },
        )
        .await
    }

    /// Most recent activities first.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` if the request is rejected.
    pub async fn activities(&self, limit: Option<i64>) -> Result<Vec<GardenActivity>> {
        let mut url = self.url("garden/activities")?;
        if let Some(limit) = limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        }
        self.send(self.inner.client.get(url)).await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Api` if the request is rejected.
    pub async fn themes(&self) -> Result<Vec<ThemeView>> {
        self.get("garden/themes").await
    }

    /// Select an owned theme or buy a new one.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 404 for an unknown theme and
    /// 409 when it cannot be bought.
    pub async fn set_theme(&self, theme: &str) -> Result<SetThemeResponse> {
        self.call_json(
            Method::PUT,
            "garden/theme",
            &SetThemeRequest {
                theme: theme.to_owned(),
            },
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Api` if the request is rejected.
    pub async fn stats(&self) -> Result<GardenStats> {
        self.get("garden/stats").await
    }

    // =========================================================================
    // Courses
    // =========================================================================

    /// # Errors
    ///
    /// Returns `ClientError::Http` on transport failure.
    pub async fn courses(&self) -> Result<Vec<Course>> {
        self.get("courses").await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 404 for an unknown course.
    pub async fn course(&self, course_id: CourseId) -> Result<Course> {
        self.get(&format!("courses/{course_id}")).await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 404 for an unknown course.
    pub async fn lessons(&self, course_id: CourseId) -> Result<Vec<Lesson>> {
        self.get(&format!("courses/{course_id}/lessons")).await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 404 for an unknown lesson.
    pub async fn complete_lesson(&self, lesson_id: LessonId) -> Result<LessonCompleteResponse> {
        self.call(
            Method::POST,
            &format!("course-integration/lessons/{lesson_id}/complete"),
        )
        .await
    }
}

/// Turn a non-2xx response into `ClientError::Api`, keeping the server's
/// message. Bodies that are not `{"error": ...}` are passed through whole.
fn api_error(status: reqwest::StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body).map_or_else(
        |_| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_owned()
            } else {
                body.to_owned()
            }
        },
        |b| b.error,
    );
    ClientError::Api { status, message }
}
