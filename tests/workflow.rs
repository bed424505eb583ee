//! End-to-end editing sessions against a mock CMS.

use serde_json::json;
use sportdesk::api::CmsClient;
use sportdesk::config::{Config, Endpoints};
use sportdesk::model::{CLUB_CATEGORIES, EntityKind, FormMode};
use sportdesk::session::{FormSession, PlainText, RichTextBinding, SubmitBlocked, SubmitState};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(base: &str) -> Config {
    Config {
        base_url: base.to_string(),
        admin_token: "secret".into(),
        endpoints: Endpoints {
            club: "/api/v1/sport_clubs/".into(),
            event: "/api/v1/events/".into(),
            news: "/api/v1/news/".into(),
        },
        image_upload_url: format!("{base}/files/upload"),
        image_base_url: "https://cdn.example/files/".into(),
        request_timeout: None,
    }
}

fn fill_club(session: &mut FormSession) {
    session.set("sport_name", "5v5 Football Night");
    session.set("sport_category", CLUB_CATEGORIES[0].value);
    session.set("location", "11.5564,104.9282");
    session.set("skill_level", "Beginner");
    session.set("price", "$5");
}

#[tokio::test]
async fn create_club_with_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files/upload"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"file": "abc123.png"}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sport_clubs/"))
        .and(body_partial_json(json!({
            "sport_name": "5v5 Football Night",
            "slug": "5v5-football-night",
            "seat_number": 20,
            "latitude": 11.5564,
            "longitude": 104.9282,
            "image": "abc123.png",
            "description": "<p>Open to all</p>"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("pitch.png");
    std::fs::write(&file, b"png").unwrap();

    let config = config(&server.uri());
    let client = CmsClient::new(config.clone()).unwrap();
    let mut session = FormSession::create(EntityKind::Club, &config);
    fill_club(&mut session);
    assert_eq!(session.values().text("slug"), "5v5-football-night");

    session.set_file_input(file.to_string_lossy());
    session.upload(&client).await.unwrap();
    assert_eq!(session.values().text("image"), "abc123.png");
    assert_eq!(
        session.preview(),
        Some("https://cdn.example/files/abc123.png")
    );

    let mut body = PlainText::new(["Open to all"]);
    session.set("seat_number", "abc");
    let blocked = session.submit(&client, &mut body).await.unwrap_err();
    assert_eq!(blocked, SubmitBlocked::Invalid(1));
    assert_eq!(
        session.error("seat_number").map(ToString::to_string),
        Some("Seat Number must be a whole number.".to_string())
    );

    session.set("seat_number", "20");
    session.submit(&client, &mut body).await.unwrap();
    assert_eq!(session.state(), &SubmitState::Succeeded);
    assert_eq!(session.values().text("sport_name"), "");
    assert_eq!(session.values().text("slug"), "");
    assert_eq!(session.preview(), None);
    assert_eq!(session.file_input(), "");
}

#[tokio::test]
async fn failed_create_keeps_input() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/news/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let config = config(&server.uri());
    let client = CmsClient::new(config.clone()).unwrap();
    let mut session = FormSession::create(EntityKind::News, &config);
    session.set("title", "Cup draw");
    session.set("thumbnail", "draw.png");
    let mut body = PlainText::new(["Tonight"]);

    session.submit(&client, &mut body).await.unwrap();
    assert_eq!(
        session.state(),
        &SubmitState::Failed("server responded 500: boom".into())
    );
    assert_eq!(session.values().text("title"), "Cup draw");
    assert_eq!(body.html().as_deref(), Some("<p>Tonight</p>"));

    let again = session.submit(&client, &mut body).await.unwrap_err();
    assert_eq!(again, SubmitBlocked::Unacknowledged);
    session.dismiss();
    assert_eq!(session.state(), &SubmitState::Idle);
}

#[tokio::test]
async fn update_fetched_club() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/sport_clubs/7/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": 7,
                "sport_category": CLUB_CATEGORIES[1].value,
                "slug": "city-ballers",
                "sport_name": "City Ballers",
                "latitude": 11.5,
                "longitude": 104.9,
                "seat_number": 12,
                "skill_level": "Open",
                "price": "free",
                "image": "ballers.png",
                "description": "<p>Weekly games</p>",
                "contact_info": {"email": "hi@ballers.example"}
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/sport_clubs/7/"))
        .and(body_partial_json(json!({
            "sport_name": "City Ballers United",
            "slug": "city-ballers-united",
            "seat_number": 12,
            "description": "<p>Weekly games</p>"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server.uri());
    let client = CmsClient::new(config.clone()).unwrap();
    let record = client.fetch(EntityKind::Club, "7").await.unwrap();
    let mut session = FormSession::update(&record, &config);
    assert_eq!(session.mode(), &FormMode::Update("7".into()));
    assert_eq!(
        session.preview(),
        Some("https://cdn.example/files/ballers.png")
    );

    session.set("sport_name", "City Ballers United");
    assert_eq!(session.values().text("slug"), "city-ballers-united");

    let mut body = PlainText::from_html(record.html());
    session.submit(&client, &mut body).await.unwrap();
    assert_eq!(session.state(), &SubmitState::Succeeded);
    // Update forms keep their values after saving.
    assert_eq!(session.values().text("sport_name"), "City Ballers United");
}
