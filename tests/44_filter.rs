mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

use common::{expect_status, TestServer};

// Catalogue shared by the filter tests:
//   João:  Homem-Aranha (Jon Watts, Ação), Interestelar (Christopher Nolan, Ficção Científica)
//   Maria: O Poderoso Chefão (Coppola, Drama), Inception (Christopher Nolan, Ficção Científica/Thriller)
async fn catalogue() -> Result<(TestServer, i64, i64)> {
    let server = common::spawn_server().await?;
    let (joao_id, joao) = server.signup("João", "joao@email.com", "senha123").await?;
    let (maria_id, maria) = server.signup("Maria", "maria@email.com", "senha456").await?;

    server.create_movie(&joao, "Homem-Aranha: Longe de Casa", "Jon Watts", "Ação").await?;
    server.create_movie(&joao, "Interestelar", "Christopher Nolan", "Ficção Científica").await?;
    server.create_movie(&maria, "O Poderoso Chefão", "Francis Ford Coppola", "Drama").await?;
    server.create_movie(&maria, "Inception", "Christopher Nolan", "Ficção Científica/Thriller").await?;

    Ok((server, joao_id, maria_id))
}

async fn titles(server: &TestServer, query: &str) -> Result<Vec<String>> {
    let body = expect_status(server.get(&format!("/filmes{query}")).await?, StatusCode::OK).await?;
    let movies = body["data"]["filmes"].as_array().cloned().unwrap_or_default();
    assert_eq!(body["data"]["total"], movies.len());
    Ok(movies
        .iter()
        .filter_map(|m| m["titulo"].as_str().map(str::to_string))
        .collect())
}

#[tokio::test]
async fn unfiltered_list_is_newest_first() -> Result<()> {
    let (server, _, _) = catalogue().await?;

    assert_eq!(
        titles(&server, "").await?,
        vec!["Inception", "O Poderoso Chefão", "Interestelar", "Homem-Aranha: Longe de Casa"]
    );
    Ok(())
}

#[tokio::test]
async fn genre_filter_is_exact() -> Result<()> {
    let (server, _, _) = catalogue().await?;

    let url = reqwest::Url::parse_with_params(&server.url("/filmes"), &[("genero", "Ação")])?;
    let body: Value = server.client.get(url).send().await?.json().await?;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["filmes"][0]["titulo"], "Homem-Aranha: Longe de Casa");

    // Exact match: the Thriller hybrid is not included
    let url = reqwest::Url::parse_with_params(&server.url("/filmes"), &[("genero", "Ficção Científica")])?;
    let body: Value = server.client.get(url).send().await?.json().await?;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["filmes"][0]["titulo"], "Interestelar");
    Ok(())
}

#[tokio::test]
async fn director_filter_is_case_sensitive_substring() -> Result<()> {
    let (server, _, _) = catalogue().await?;

    assert_eq!(titles(&server, "?diretor=Nolan").await?, vec!["Inception", "Interestelar"]);
    assert!(titles(&server, "?diretor=nolan").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn owner_filter_and_combination() -> Result<()> {
    let (server, joao_id, maria_id) = catalogue().await?;

    assert_eq!(
        titles(&server, &format!("?usuario_id={joao_id}")).await?,
        vec!["Interestelar", "Homem-Aranha: Longe de Casa"]
    );
    assert_eq!(
        titles(&server, &format!("?usuario_id={maria_id}&diretor=Nolan")).await?,
        vec!["Inception"]
    );
    assert!(titles(&server, &format!("?usuario_id={joao_id}&diretor=Coppola")).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn empty_filters_are_ignored() -> Result<()> {
    let (server, _, _) = catalogue().await?;
    assert_eq!(titles(&server, "?genero=&diretor=&usuario_id=").await?.len(), 4);
    Ok(())
}

#[tokio::test]
async fn non_numeric_owner_filter_is_bad_request() -> Result<()> {
    let (server, _, _) = catalogue().await?;

    let body = expect_status(server.get("/filmes?usuario_id=joao").await?, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["code"], "BAD_REQUEST");
    Ok(())
}
