//! Endpoint tests for the HomeStay API modules
//!
//! Each test pins one backend call: method, path, query string, JSON body and
//! the typed value decoded from the response.

use std::sync::Arc;

use homestay_mp_sdk::api::{AvailabilityQuery, BookingListQuery, CreateBookingRequest};
use homestay_mp_sdk::platform::{KeyValueStorage, MemoryStorage, TOKEN_KEY};
use homestay_mp_sdk::types::BookingStatus;
use homestay_mp_sdk::Homestay;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn envelope(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": 0,
        "message": "success",
        "data": data
    }))
}

fn create_test_client(mock_server: &MockServer) -> Homestay {
    Homestay::builder()
        .base_url(mock_server.uri())
        .build()
        .unwrap()
}

fn create_logged_in_client(mock_server: &MockServer) -> Homestay {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(TOKEN_KEY, "tok-123").unwrap();
    Homestay::builder()
        .base_url(mock_server.uri())
        .storage(storage)
        .build()
        .unwrap()
}

fn booking_json(id: i64, status: i32) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": 7,
        "store_id": 1,
        "room_type_id": 3,
        "check_in_date": "2025-06-10",
        "check_out_date": "2025-06-12",
        "guest_name": "张三",
        "guest_phone": "13800138000",
        "guest_count": 2,
        "total_price": 576.0,
        "status": status,
        "items": [
            {"date": "2025-06-10", "price": 288.0},
            {"date": "2025-06-11", "price": 288.0}
        ],
        "created_at": "2025-06-01T10:00:00"
    })
}

// Auth

#[tokio::test]
async fn test_wx_login_posts_code_and_stores_session() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/wx/login"))
        .and(body_json(json!({"code": "081abc"})))
        .respond_with(envelope(json!({
            "token": "tok-new",
            "user": {"id": 7, "nickname": "小明", "created_at": "2025-01-01T00:00:00"},
            "is_new_user": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let homestay = create_test_client(&mock_server);
    let response = homestay.login("081abc").await.unwrap();

    assert_eq!(response.token, "tok-new");
    assert!(response.is_new_user);
    assert_eq!(response.user.nickname.as_deref(), Some("小明"));
    assert!(homestay.session().is_logged_in().await);
    assert_eq!(
        homestay.session().token().await.unwrap().as_str(),
        "tok-new"
    );
}

#[tokio::test]
async fn test_wx_phone_login_posts_code() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/wx/phone-login"))
        .and(body_json(json!({"code": "phone-code"})))
        .respond_with(envelope(json!({
            "token": "tok-phone",
            "user": {"id": 8, "phone": "13800138000"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let homestay = create_test_client(&mock_server);
    let response = homestay.phone_login("phone-code").await.unwrap();

    assert!(!response.is_new_user);
    assert_eq!(response.user.phone.as_deref(), Some("13800138000"));
    assert_eq!(homestay.session().user().await.unwrap().id, 8);
}

#[tokio::test]
async fn test_me_sends_bearer_and_updates_profile() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(envelope(json!({"id": 7, "nickname": "小明"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let homestay = create_logged_in_client(&mock_server);
    let user = homestay.current_user().await.unwrap();

    assert_eq!(user.id, 7);
    assert_eq!(homestay.session().user().await, Some(user));
}

#[tokio::test]
async fn test_refresh_replaces_stored_token() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(envelope(json!({"token": "tok-456"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let homestay = create_logged_in_client(&mock_server);
    homestay.refresh_session().await.unwrap();

    assert_eq!(
        homestay.session().token().await.unwrap().as_str(),
        "tok-456"
    );
}

// Stores

#[tokio::test]
async fn test_store_list_with_city_filter() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/stores/list"))
        .and(query_param("city", "杭州"))
        .respond_with(envelope(json!([
            {"id": 1, "name": "西湖店", "city": "杭州", "address": "西湖区1号"},
            {"id": 2, "name": "滨江店", "city": "杭州", "is_active": false}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let homestay = create_test_client(&mock_server);
    let stores = homestay.store_api().list(Some("杭州")).await.unwrap();

    assert_eq!(stores.len(), 2);
    assert_eq!(stores[0].address.as_deref(), Some("西湖区1号"));
    assert!(stores[0].is_active);
    assert!(!stores[1].is_active);
}

#[tokio::test]
async fn test_store_list_empty_city_is_omitted() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/stores/list"))
        .and(query_param_is_missing("city"))
        .respond_with(envelope(json!([])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let homestay = create_test_client(&mock_server);
    assert!(homestay.store_api().list(Some("")).await.unwrap().is_empty());
    assert!(homestay.store_api().list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_store_list_accepts_paginated_shape() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/stores/list"))
        .respond_with(envelope(json!({
            "items": [{"id": 1, "name": "西湖店"}],
            "total": 1,
            "page": 1,
            "page_size": 20
        })))
        .mount(&mock_server)
        .await;

    let homestay = create_test_client(&mock_server);
    let stores = homestay.store_api().list(None).await.unwrap();

    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].name, "西湖店");
}

#[tokio::test]
async fn test_store_detail_path() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/stores/5/detail"))
        .respond_with(envelope(json!({
            "id": 5,
            "name": "鼓浪屿店",
            "city": "厦门",
            "phone": "0592-1234567"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let homestay = create_test_client(&mock_server);
    let store = homestay.store_api().detail(5).await.unwrap();

    assert_eq!(store.id, 5);
    assert_eq!(store.phone.as_deref(), Some("0592-1234567"));
}

// Rooms

#[tokio::test]
async fn test_room_type_list_path() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/rooms/types/list/1"))
        .respond_with(envelope(json!([
            {
                "id": 3,
                "store_id": 1,
                "name": "湖景大床房",
                "base_price": 288.0,
                "max_guests": 2,
                "bed_type": "大床",
                "images": ["/rooms/3/a.jpg"],
                "amenities": ["WiFi", "空调"]
            }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let homestay = create_test_client(&mock_server);
    let room_types = homestay.room_types(1).await.unwrap();

    assert_eq!(room_types.len(), 1);
    assert_eq!(room_types[0].max_guests, 2);
    assert_eq!(room_types[0].amenities, vec!["WiFi", "空调"]);
    assert_eq!(
        homestay.image_url(&room_types[0].images[0]),
        format!("{}/static/rooms/3/a.jpg", mock_server.uri())
    );
}

#[tokio::test]
async fn test_room_prices_query_bounds() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/rooms/prices/3"))
        .and(query_param("check_in", "2025-06-10"))
        .and(query_param("check_out", "2025-06-12"))
        .respond_with(envelope(json!([
            {"date": "2025-06-10", "price": 288.0, "available": true},
            {"date": "2025-06-11", "price": 328.0, "available": false}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let homestay = create_test_client(&mock_server);
    let prices = homestay
        .room_prices(3, Some("2025-06-10"), Some("2025-06-12"))
        .await
        .unwrap();

    assert_eq!(prices.len(), 2);
    assert!(prices[0].available);
    assert!(!prices[1].available);
    assert_eq!(prices[1].price, 328.0);
}

#[tokio::test]
async fn test_room_prices_without_bounds() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/rooms/prices/3"))
        .and(query_param_is_missing("check_in"))
        .and(query_param_is_missing("check_out"))
        .respond_with(envelope(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let homestay = create_test_client(&mock_server);
    assert!(homestay.room_prices(3, None, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_check_availability_query() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/rooms/availability"))
        .and(query_param("room_type_id", "3"))
        .and(query_param("check_in_date", "2025-06-10"))
        .and(query_param("check_out_date", "2025-06-12"))
        .respond_with(envelope(json!({"available": false, "message": "2025-06-11 已满房"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let homestay = create_test_client(&mock_server);
    let availability = homestay
        .check_availability(&AvailabilityQuery::new(3, "2025-06-10", "2025-06-12"))
        .await
        .unwrap();

    assert!(!availability.available);
    assert_eq!(availability.message.as_deref(), Some("2025-06-11 已满房"));
}

// Bookings

#[tokio::test]
async fn test_create_booking_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/bookings"))
        .and(header("authorization", "Bearer tok-123"))
        .and(body_json(json!({
            "store_id": 1,
            "room_type_id": 3,
            "check_in_date": "2025-06-10",
            "check_out_date": "2025-06-12",
            "guest_name": "张三",
            "guest_phone": "13800138000",
            "guest_count": 2,
            "remark": "晚到"
        })))
        .respond_with(envelope(booking_json(11, 0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let homestay = create_logged_in_client(&mock_server);
    let request = CreateBookingRequest::new(
        1,
        3,
        "2025-06-10",
        "2025-06-12",
        "张三",
        "13800138000",
    )
    .guest_count(2)
    .remark("晚到");
    let booking = homestay.create_booking(&request).await.unwrap();

    assert_eq!(booking.id, 11);
    assert_eq!(booking.status(), Some(BookingStatus::PendingPayment));
    assert_eq!(booking.items.len(), 2);
    assert_eq!(booking.total_price, 576.0);
}

#[tokio::test]
async fn test_my_bookings_bare_array() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/bookings/my"))
        .and(query_param_is_missing("status"))
        .respond_with(envelope(json!([booking_json(1, 2), booking_json(2, 5)])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let homestay = create_logged_in_client(&mock_server);
    let page = homestay
        .my_bookings(&BookingListQuery::new())
        .await
        .unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page.total, Some(2));
    assert_eq!(page.items[1].status(), Some(BookingStatus::Cancelled));
}

#[tokio::test]
async fn test_my_bookings_paginated_with_filters() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/bookings/my"))
        .and(query_param("status", "2"))
        .and(query_param("page", "2"))
        .and(query_param("page_size", "10"))
        .respond_with(envelope(json!({
            "items": [booking_json(21, 2)],
            "total": 11,
            "page": 2,
            "page_size": 10
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let homestay = create_logged_in_client(&mock_server);
    let query = BookingListQuery::new()
        .status(BookingStatus::Confirmed)
        .page(2, 10);
    let page = homestay.my_bookings(&query).await.unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page.total, Some(11));
    assert_eq!(page.page, Some(2));
    assert_eq!(page.items[0].status(), Some(BookingStatus::Confirmed));
    assert!(!page.items[0].is_cancellable());
}

#[tokio::test]
async fn test_booking_detail_path() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/bookings/my/11"))
        .respond_with(envelope(booking_json(11, 3)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let homestay = create_logged_in_client(&mock_server);
    let booking = homestay.booking_detail(11).await.unwrap();

    assert_eq!(booking.status(), Some(BookingStatus::CheckedIn));
    assert_eq!(booking.guest_count, Some(2));
}

#[tokio::test]
async fn test_cancel_booking_with_reason() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/bookings/my/11/cancel"))
        .and(body_json(json!({"reason": "行程变更"})))
        .respond_with(envelope(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let homestay = create_logged_in_client(&mock_server);
    let response = homestay
        .cancel_booking(11, Some("行程变更"))
        .await
        .unwrap();

    assert!(response.success);
}

#[tokio::test]
async fn test_cancel_booking_without_reason_sends_empty_object() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/bookings/my/12/cancel"))
        .and(body_json(json!({})))
        .respond_with(envelope(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let homestay = create_logged_in_client(&mock_server);
    assert!(homestay.cancel_booking(12, None).await.unwrap().success);
}
