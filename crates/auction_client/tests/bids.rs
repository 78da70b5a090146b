use auction_client::{ApiClient, ApiError};
use auction_core::BidOutcome;
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn place(status: u16) -> BidOutcome {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auction/item/item-7/bids"))
        .and(body_json(serde_json::json!({ "bid": 350 })))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).expect("client");
    client.place_bid("item-7", 350).await.expect("bid resolves")
}

#[tokio::test]
async fn every_documented_status_maps_to_an_outcome() {
    assert_eq!(place(201).await, BidOutcome::Accepted);
    assert_eq!(place(200).await, BidOutcome::AlreadyHighest);
    assert_eq!(place(400).await, BidOutcome::TooLow);
    assert_eq!(place(401).await, BidOutcome::Unauthenticated);
    assert_eq!(place(403).await, BidOutcome::NotStarted);
    assert_eq!(place(404).await, BidOutcome::NotFound);
    assert_eq!(place(410).await, BidOutcome::Ended);
}

#[tokio::test]
async fn unexpected_statuses_still_resolve_instead_of_erroring() {
    assert_eq!(place(503).await, BidOutcome::Other);
    assert_eq!(place(418).await, BidOutcome::Other);
}

#[tokio::test]
async fn item_detail_decodes_history_newest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auction/item/item-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "item-7",
            "title": "Walnut desk",
            "description": "Mid-century, lightly used.",
            "startPrice": 300,
            "startTime": "2026-03-01T10:00:00.000Z",
            "endTime": "2026-03-08T10:00:00.000Z",
            "carousels": ["/images/desk-1.jpg"],
            "bidRecords": [
                { "user": "amy", "bid": 350, "time": "2026-03-02T12:00:00.000Z" },
                { "user": "ben", "bid": 310, "time": "2026-03-01T18:00:00.000Z" },
            ],
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).expect("client");
    let detail = client.item_detail("item-7").await.expect("detail ok");
    assert_eq!(detail.bid_records.len(), 2);
    assert_eq!(detail.bid_records[0].user, "amy");
    assert_eq!(detail.bid_records[0].bid, 350);

    let (snapshot, history) = auction_client::live_page_parts(detail);
    assert_eq!(snapshot.id, "item-7");
    assert_eq!(snapshot.start_price, 300);
    assert_eq!(history[0].user, "amy");
    assert!(history[0].time_ms > history[1].time_ms);
}

#[tokio::test]
async fn missing_item_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auction/item/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).expect("client");
    let err = client.item_detail("gone").await.expect_err("should fail");
    assert!(matches!(err, ApiError::Status(404)));
}

#[tokio::test]
async fn create_auction_returns_the_location_of_the_new_item() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auction/item"))
        .respond_with(ResponseTemplate::new(201).insert_header("Location", "/auction/item/item-9"))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).expect("client");
    let draft = auction_client::AuctionDraft {
        title: "Walnut desk".to_string(),
        starting_price: 300,
        start_time: "2026-03-01T10:00:00.000Z".parse().expect("start"),
        end_time: "2026-03-08T10:00:00.000Z".parse().expect("end"),
        description: "Mid-century, lightly used.".to_string(),
        carousels: vec![],
    };
    let location = client.create_auction(&draft).await.expect("created");
    assert_eq!(location, "/auction/item/item-9");
}

#[tokio::test]
async fn create_auction_without_location_header_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auction/item"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).expect("client");
    let draft = auction_client::AuctionDraft {
        title: "Walnut desk".to_string(),
        starting_price: 300,
        start_time: "2026-03-01T10:00:00.000Z".parse().expect("start"),
        end_time: "2026-03-08T10:00:00.000Z".parse().expect("end"),
        description: String::new(),
        carousels: vec![],
    };
    let err = client.create_auction(&draft).await.expect_err("no location");
    assert!(matches!(err, ApiError::MissingLocation));
}
