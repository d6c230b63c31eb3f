//! Unified HomeStay client

use std::sync::Arc;

use crate::api::auth::AuthApi;
use crate::api::booking::{BookingApi, BookingListQuery, CreateBookingRequest};
use crate::api::room::{AvailabilityQuery, RoomApi};
use crate::api::store::StoreApi;
use crate::api::ApiContext;
use crate::error::HomestayError;
use crate::events::{AppEvent, EventBus, ListenerId};
use crate::platform::{LoginProvider, Notifier};
use crate::routes;
use crate::stores::{BookingDates, Session, StoreSelection};
use crate::types::{
    Availability, Booking, CancelBookingResponse, LoginResponse, Page, RoomPrice, RoomType, Store,
    User,
};
use crate::utils::date::Clock;

use super::HomestayClient;

/// Unified HomeStay client
///
/// Owns the HTTP client, the session and the shared store selection, and
/// exposes every backend operation through one handle. Cloning is cheap and
/// every clone shares the same session.
///
/// # Example
///
/// ```rust,ignore
/// use homestay_mp_sdk::Homestay;
/// use homestay_mp_sdk::api::CreateBookingRequest;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let homestay = Homestay::builder()
///         .base_url("https://booking.example.com")
///         .build()?;
///
///     homestay.login("code_from_wx_login").await?;
///
///     let dates = homestay.booking_dates();
///     let request = CreateBookingRequest::new(
///         1, 3, dates.check_in_date(), dates.check_out_date(), "张三", "13800138000",
///     );
///     let booking = homestay.create_booking(&request).await?;
///     println!("booking #{}", booking.id);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Homestay {
    context: Arc<ApiContext>,
    selection: Arc<StoreSelection>,
    login_provider: Arc<dyn LoginProvider>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Homestay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Homestay")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl Homestay {
    pub(crate) fn new(
        context: Arc<ApiContext>,
        login_provider: Arc<dyn LoginProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            context,
            selection: Arc::new(StoreSelection::new()),
            login_provider,
            clock,
        }
    }

    pub fn builder() -> super::builder::HomestayBuilder {
        super::builder::HomestayBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        self.context.client().base_url()
    }

    /// True when pointed at a local development backend.
    pub fn is_dev(&self) -> bool {
        routes::is_dev(self.base_url())
    }

    /// Absolute URL for a backend-relative image path.
    pub fn image_url(&self, path: &str) -> String {
        routes::image_url(self.base_url(), path)
    }

    pub fn client(&self) -> &HomestayClient {
        self.context.client()
    }

    pub fn session(&self) -> &Session {
        self.context.session()
    }

    pub fn events(&self) -> &EventBus {
        self.context.client().events()
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        self.context.client().notifier()
    }

    /// Register a handler fired whenever the backend answers 401.
    ///
    /// The session is already cleared when the handler runs.
    pub fn on_session_expired<F>(&self, handler: F) -> ListenerId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.events().on(AppEvent::SessionExpired, handler)
    }

    pub fn auth_api(&self) -> AuthApi {
        AuthApi::new(self.context.clone())
    }

    pub fn store_api(&self) -> StoreApi {
        StoreApi::new(self.context.clone())
    }

    pub fn room_api(&self) -> RoomApi {
        RoomApi::new(self.context.clone())
    }

    pub fn booking_api(&self) -> BookingApi {
        BookingApi::new(self.context.clone())
    }

    // Session

    /// Exchange a login handshake code and store the resulting session.
    pub async fn login(&self, code: &str) -> Result<LoginResponse, HomestayError> {
        let response = self.auth_api().wx_login(code).await?;
        self.session()
            .set_login_info(&response.token, response.user.clone())
            .await?;
        Ok(response)
    }

    /// Exchange a phone-number authorization code and store the resulting session.
    pub async fn phone_login(&self, code: &str) -> Result<LoginResponse, HomestayError> {
        let response = self.auth_api().wx_phone_login(code).await?;
        self.session()
            .set_login_info(&response.token, response.user.clone())
            .await?;
        Ok(response)
    }

    /// Restore or obtain a session without user interaction.
    ///
    /// See [`Session::silent_login`].
    pub async fn silent_login(&self) -> bool {
        self.session()
            .silent_login(self.client(), self.login_provider.as_ref())
            .await
    }

    /// Fetch the current user and refresh the stored profile.
    pub async fn current_user(&self) -> Result<User, HomestayError> {
        let user = self.auth_api().me().await?;
        self.session().set_user_info(user.clone()).await?;
        Ok(user)
    }

    /// Swap the stored token for a fresh one.
    pub async fn refresh_session(&self) -> Result<(), HomestayError> {
        let response = self.auth_api().refresh_token().await?;
        self.session().set_token(&response.token).await
    }

    pub async fn logout(&self) {
        self.session().logout().await;
    }

    // Stores

    pub fn store_selection(&self) -> &StoreSelection {
        &self.selection
    }

    /// Load the store list into the shared selection; empty on failure.
    pub async fn load_stores(&self, city: Option<&str>) -> Vec<Store> {
        self.selection.load_stores(&self.store_api(), city).await
    }

    /// Load a store and make it current; `None` on failure.
    pub async fn load_store_detail(&self, store_id: i64) -> Option<Store> {
        self.selection
            .load_store_detail(&self.store_api(), store_id)
            .await
    }

    // Rooms

    pub async fn room_types(&self, store_id: i64) -> Result<Vec<RoomType>, HomestayError> {
        self.room_api().type_list(store_id).await
    }

    pub async fn room_prices(
        &self,
        room_type_id: i64,
        check_in: Option<&str>,
        check_out: Option<&str>,
    ) -> Result<Vec<RoomPrice>, HomestayError> {
        self.room_api()
            .prices(room_type_id, check_in, check_out)
            .await
    }

    pub async fn check_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<Availability, HomestayError> {
        self.room_api().check_availability(query).await
    }

    // Bookings

    /// A new date range starting today, driven by this client's clock.
    ///
    /// Unlike [`store_selection`](Self::store_selection), the range is not
    /// shared: every call returns an independent container owned by the caller.
    pub fn booking_dates(&self) -> BookingDates {
        BookingDates::new(self.clock.clone(), self.notifier().clone())
    }

    pub async fn create_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> Result<Booking, HomestayError> {
        self.booking_api().create(request).await
    }

    pub async fn my_bookings(
        &self,
        query: &BookingListQuery,
    ) -> Result<Page<Booking>, HomestayError> {
        self.booking_api().my_bookings(query).await
    }

    pub async fn booking_detail(&self, booking_id: i64) -> Result<Booking, HomestayError> {
        self.booking_api().detail(booking_id).await
    }

    pub async fn cancel_booking(
        &self,
        booking_id: i64,
        reason: Option<&str>,
    ) -> Result<CancelBookingResponse, HomestayError> {
        self.booking_api().cancel(booking_id, reason).await
    }
}
