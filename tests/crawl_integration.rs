//! End-to-end crawl tests against a local mock site.

use coinafrique_crawler::coinafrique::CoinAfriqueClient;
use coinafrique_crawler::commands::ScrapeCommand;
use coinafrique_crawler::config::Config;
use coinafrique_crawler::sink;
use coinafrique_crawler::{Crawler, Error};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listing(hrefs: &[&str]) -> String {
    let cards: String = hrefs
        .iter()
        .map(|h| {
            format!(
                r#"<div class="col s6 m4 l3"><a href="{}"><img src="https://images.example/{}.jpg"></a></div>"#,
                h,
                h.trim_start_matches("/annonce/")
            )
        })
        .collect();
    format!("<html><body><div class=\"row\">{}</div></body></html>", cards)
}

fn detail(name: &str, price: &str, address: &str) -> String {
    format!(
        r#"<html><body><h1 class="title title-ad hide-on-large-and-down">{}</h1><p class="price">{}</p><span data-address="{}"></span></body></html>"#,
        name, price, address
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn make_test_config(server: &MockServer) -> Config {
    Config { base_url: server.uri(), seed: Some(3), ..Config::default() }.without_delays()
}

/// Two listing pages of sheep ads, one of them price-on-request,
/// one far below the mean and one whose detail page is gone.
async fn sheep_site() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/categorie/moutons"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing(&["/annonce/m4", "/annonce/m5"])),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    mount_page(&server, "/categorie/moutons", listing(&["/annonce/m1", "/annonce/m2", "/annonce/m3"]))
        .await;

    mount_page(&server, "/annonce/m1", detail("Mouton Ladoum", "300 000 CFA", "Dakar")).await;
    mount_page(&server, "/annonce/m2", detail("Bélier", "Prix sur demande", "Thiès")).await;
    mount_page(&server, "/annonce/m3", detail("Agneau", "10 000 CFA", "Rufisque")).await;
    mount_page(&server, "/annonce/m4", detail("Mouton Ladoum", "250 000 CFA", "Pikine")).await;
    Mock::given(method("GET"))
        .and(path("/annonce/m5"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_crawl_two_pages_and_clean() {
    let server = sheep_site().await;
    let config = make_test_config(&server);

    let client = CoinAfriqueClient::new(&config).unwrap();
    let mut crawler = Crawler::new(client, &config).unwrap();
    let table = crawler.scrape_category("moutons", 2).await.unwrap();

    // Mean of 300k, 10k and 250k is ~186.7k, so the 10k lamb falls under half of it
    assert_eq!(table.names(), vec!["Mouton Ladoum", "Mouton Ladoum 1"]);

    let first = table.get(0).unwrap();
    assert_eq!(first.price.as_deref(), Some("300 000 CFA"));
    assert_eq!(first.address.as_deref(), Some("Dakar"));
    assert_eq!(first.image_url.as_deref(), Some("https://images.example/m1.jpg"));

    let second = table.get(1).unwrap();
    assert_eq!(second.address.as_deref(), Some("Pikine"));
}

#[tokio::test]
async fn test_listing_error_aborts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/categorie/chiens"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = make_test_config(&server);
    let client = CoinAfriqueClient::new(&config).unwrap();
    let mut crawler = Crawler::new(client, &config).unwrap();

    let err = crawler.scrape_category("chiens", 1).await.unwrap_err();
    match err {
        Error::Scrape { page, source, .. } => {
            assert_eq!(page, 1);
            assert_eq!(source.status(), Some(503));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_scrape_command_saves_csv() {
    let server = sheep_site().await;
    let dir = TempDir::new().unwrap();

    let mut config = make_test_config(&server);
    config.pages = 2;
    config.output_dir = dir.path().to_path_buf();

    let output = ScrapeCommand::new(config).execute("moutons", Some("moutons_test")).await.unwrap();
    assert!(output.contains("Saved to"));

    let path = dir.path().join("moutons_test.csv");
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("nom,prix,adresse,image_lien\n"));

    let saved = sink::load_table(&path).unwrap();
    assert_eq!(saved.len(), 2);
}
