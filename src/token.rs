//! App-only token acquisition with caching and single-flight refresh.
//!
//! [`TokenProvider::access_token`] hands out the cached bearer token while it is outside the
//! preemptive refresh window. Once the token is missing, expired, or about to expire, one
//! caller performs the client-credentials exchange while concurrent callers wait on the same
//! guard and reuse the result instead of stampeding the token endpoint.

pub mod cache;

pub use cache::*;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ClientId, Secret},
	http::{ReqwestHttpClient, TokenHttpClient},
	oauth::{BasicFacade, OAuth2Facade, ReqwestTransportErrorMapper, TransportErrorMapper},
	obs::{self, TokenCacheResult},
	provider::{ProviderDescriptor, ProviderStrategy},
};

/// Token provider specialized for the crate's reqwest transport stack.
pub type ReqwestTokenProvider = TokenProvider<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Obtains and caches app-only access tokens for a single confidential client.
pub struct TokenProvider<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every token request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Identity provider the tokens are requested from.
	pub descriptor: ProviderDescriptor,
	/// Strategy responsible for provider-specific request tweaks and error classification.
	pub strategy: Arc<dyn ProviderStrategy>,
	/// Application (client) identifier.
	pub client_id: ClientId,
	/// Cache holding the most recent token.
	pub cache: Arc<TokenCache>,
	client_secret: Secret,
	refresh_window: Duration,
	guard: AsyncMutex<()>,
}
impl<C, M> TokenProvider<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	const DEFAULT_REFRESH_WINDOW: Duration = Duration::seconds(60);

	/// Creates a provider that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		strategy: Arc<dyn ProviderStrategy>,
		client_id: ClientId,
		client_secret: Secret,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			descriptor,
			strategy,
			client_id,
			cache: Default::default(),
			client_secret,
			refresh_window: Self::DEFAULT_REFRESH_WINDOW,
			guard: AsyncMutex::new(()),
		}
	}

	/// Overrides the preemptive refresh window (defaults to 60 seconds).
	///
	/// Negative windows are clamped to zero, which refreshes only once the token expired.
	pub fn with_refresh_window(mut self, window: Duration) -> Self {
		self.refresh_window = if window.is_negative() { Duration::ZERO } else { window };

		self
	}

	/// Returns the configured refresh window.
	pub fn refresh_window(&self) -> Duration {
		self.refresh_window
	}

	/// Returns a token that stays valid for at least the refresh window.
	pub async fn access_token(&self) -> Result<AccessToken> {
		self.acquire(false).await
	}

	/// Bypasses the cache and performs a new exchange.
	pub async fn refresh(&self) -> Result<AccessToken> {
		self.acquire(true).await
	}

	/// Determines whether `token` must be replaced at `now`.
	///
	/// The refresh window never exceeds half of the token's lifetime, so a short-lived token
	/// is still reused for the first half of its validity.
	pub fn should_refresh(&self, token: &AccessToken, now: OffsetDateTime) -> bool {
		if token.is_expired_at(now) {
			return true;
		}

		let window = self.refresh_window.min(token.lifetime() / 2);

		if !window.is_positive() {
			return false;
		}

		token.remaining_at(now) <= window
	}

	async fn acquire(&self, force: bool) -> Result<AccessToken> {
		if let Some(token) = self.usable_cached(force) {
			obs::record_token_cache(TokenCacheResult::Hit);

			return Ok(token);
		}

		let _singleflight = self.guard.lock().await;

		if let Some(token) = self.usable_cached(force) {
			obs::record_token_cache(TokenCacheResult::Coalesced);

			return Ok(token);
		}

		obs::record_token_cache(TokenCacheResult::Refresh);
		tracing::debug!(provider = %self.descriptor.id, force, "Requesting a new access token.");

		let token = self.exchange().await?;

		self.cache.store(token.clone());
		tracing::info!(
			provider = %self.descriptor.id,
			expires_at = %token.expires_at,
			"Access token refreshed."
		);

		Ok(token)
	}

	fn usable_cached(&self, force: bool) -> Option<AccessToken> {
		if force {
			return None;
		}

		let now = OffsetDateTime::now_utc();

		self.cache.current().filter(|token| !self.should_refresh(token, now))
	}

	async fn exchange(&self) -> Result<AccessToken> {
		let mut form = BTreeMap::new();

		<dyn ProviderStrategy>::augment_token_request(self.strategy.as_ref(), &mut form);

		let extra_params: Vec<(String, String)> = form
			.into_iter()
			.filter(|(key, _)| key != "grant_type" && key != "scope")
			.collect();
		let facade: BasicFacade<C, M> = BasicFacade::from_descriptor(
			&self.descriptor,
			self.client_id.as_ref(),
			&self.client_secret,
			self.http_client.clone(),
			self.transport_mapper.clone(),
		)?;

		facade.exchange_client_credentials(self.strategy.as_ref(), extra_params.as_slice()).await
	}
}
impl<C, M> Debug for TokenProvider<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenProvider")
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.client_id)
			.field("refresh_window", &self.refresh_window)
			.finish()
	}
}
