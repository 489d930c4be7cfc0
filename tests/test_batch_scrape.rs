use edo_recipe_scraper::fetchers::DEFAULT_USER_AGENT;
use edo_recipe_scraper::{
    count_recipes, output, scrape_recipes, ScrapeError, ScraperConfig, Selection,
};

fn create_listing_html(count: u32) -> String {
    let rows: String = (1..=count)
        .map(|i| {
            format!(r#"<tr><td>{i}</td><td><a href="{i:03}.html.ja">玉子料理{i}</a></td></tr>"#)
        })
        .collect();
    format!(
        r#"
        <html><body>
            <table>
                <thead><tr><th>番号</th><th>料理名</th></tr></thead>
                <tbody>{rows}</tbody>
            </table>
        </body></html>
        "#
    )
}

fn create_recipe_html(i: u32) -> String {
    format!(
        r#"
        <html><body>
            <h2>原文</h2>
            <p>玉子{i}つ</p>
            <h2>現代レシピ</h2>
            <table>
                <tr><th>材料</th><th>分量</th></tr>
                <tr><td>卵</td><td>{i}個</td></tr>
            </table>
        </body></html>
        "#
    )
}

fn config_for(server: &mockito::Server) -> ScraperConfig {
    ScraperConfig {
        base_url: format!("{}/recipe/", server.url()),
        delay_secs: 0.0,
        ..Default::default()
    }
}

async fn mock_listing(server: &mut mockito::Server, count: u32) -> mockito::Mock {
    server
        .mock("GET", "/recipe/")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(create_listing_html(count))
        .create_async()
        .await
}

async fn mock_recipe(server: &mut mockito::Server, i: u32) -> mockito::Mock {
    server
        .mock("GET", format!("/recipe/{i:03}.html.ja").as_str())
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(create_recipe_html(i))
        .create_async()
        .await
}

#[tokio::test]
async fn test_batch_skips_failed_recipe() {
    let mut server = mockito::Server::new_async().await;
    let _listing = mock_listing(&mut server, 5).await;
    let mut mocks = Vec::new();
    for i in [1, 2, 4, 5] {
        mocks.push(mock_recipe(&mut server, i).await);
    }
    let failing = server
        .mock("GET", "/recipe/003.html.ja")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let outcome = scrape_recipes(&config_for(&server), Selection::All)
        .await
        .unwrap();

    let ids: Vec<u32> = outcome.recipes.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 4, 5]);
    assert_eq!(outcome.requested, 5);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].listing.id, 3);
    assert!(outcome.skipped[0].reason.contains("500"));
    failing.assert_async().await;

    let fourth = &outcome.recipes[2];
    assert_eq!(fourth.name, "玉子料理4");
    assert_eq!(fourth.url, format!("{}/recipe/004.html.ja", server.url()));
    assert_eq!(fourth.modern_recipe.ingredients, vec!["卵: 4個"]);
    assert_eq!(fourth.original_text[0], "玉子4つ");
}

#[tokio::test]
async fn test_batch_first_n_keeps_listing_order() {
    let mut server = mockito::Server::new_async().await;
    let _listing = mock_listing(&mut server, 5).await;
    let first = mock_recipe(&mut server, 1).await;
    let second = mock_recipe(&mut server, 2).await;
    let third = server
        .mock("GET", "/recipe/003.html.ja")
        .expect(0)
        .create_async()
        .await;

    let outcome = scrape_recipes(&config_for(&server), Selection::First(2))
        .await
        .unwrap();

    assert_eq!(outcome.succeeded(), 2);
    assert_eq!(outcome.recipes[0].id, 1);
    assert_eq!(outcome.recipes[1].id, 2);
    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
}

#[tokio::test]
async fn test_single_recipe_and_missing_id() {
    let mut server = mockito::Server::new_async().await;
    let _listing = mock_listing(&mut server, 3).await;
    let _recipe = mock_recipe(&mut server, 2).await;
    let config = config_for(&server);

    let outcome = scrape_recipes(&config, Selection::Single(2)).await.unwrap();
    assert_eq!(outcome.recipes.len(), 1);
    assert_eq!(outcome.recipes[0].modern_recipe.ingredients, vec!["卵: 2個"]);

    let err = scrape_recipes(&config, Selection::Single(99)).await.unwrap_err();
    assert!(matches!(err, ScrapeError::NotFound(99)));
}

#[tokio::test]
async fn test_listing_failure_aborts_batch() {
    let mut server = mockito::Server::new_async().await;
    let _listing = server
        .mock("GET", "/recipe/")
        .with_status(503)
        .create_async()
        .await;

    let err = scrape_recipes(&config_for(&server), Selection::All)
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_requests_carry_user_agent() {
    let mut server = mockito::Server::new_async().await;
    let listing = server
        .mock("GET", "/recipe/")
        .match_header("user-agent", DEFAULT_USER_AGENT)
        .with_status(200)
        .with_body(create_listing_html(4))
        .create_async()
        .await;

    let count = count_recipes(&config_for(&server)).await.unwrap();

    assert_eq!(count, 4);
    listing.assert_async().await;
}

#[tokio::test]
async fn test_scraped_batch_saves_json_and_csv() {
    let mut server = mockito::Server::new_async().await;
    let _listing = mock_listing(&mut server, 2).await;
    let _first = mock_recipe(&mut server, 1).await;
    let _second = mock_recipe(&mut server, 2).await;

    let outcome = scrape_recipes(&config_for(&server), Selection::All)
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let (json_path, csv_path) = output::save_outputs(&dir.path().join("batch"), &outcome.recipes)
        .await
        .unwrap();

    let saved = output::from_json(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(saved, outcome.recipes);

    let csv = std::fs::read_to_string(csv_path).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.lines().nth(2).unwrap().starts_with("2,玉子料理2,"));
}
