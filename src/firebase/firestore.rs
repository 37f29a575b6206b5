use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::debug;

use super::auth::AuthUser;
use super::error::{api_error, FirebaseError};

/// Backend-assigned address of one document inside a named collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRef {
    pub collection: String,
    pub id: String,
}

/// A fetched document. Field values are kept in the backend's typed-value
/// encoding; nothing here interprets them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

impl Document {
    /// The last path segment of the resource name.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Document store client speaking the Firestore v1 REST API.
pub struct FirestoreClient {
    http: Client,
    endpoint: String,
    project_id: String,
    api_key: String,
    user: watch::Receiver<Option<AuthUser>>,
}

impl FirestoreClient {
    pub(crate) fn new(
        http: Client,
        endpoint: &str,
        project_id: &str,
        api_key: &str,
        user: watch::Receiver<Option<AuthUser>>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.to_string(),
            project_id: project_id.to_string(),
            api_key: api_key.to_string(),
            user,
        }
    }

    /// `.../documents/<segments...>`, each segment percent-encoded on its own
    /// so ids containing `?`, `#`, `%` or spaces stay inside the path.
    fn documents_url(&self, segments: &[&str]) -> Result<Url, FirebaseError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| FirebaseError::InvalidConfig(format!("firestore endpoint: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| FirebaseError::InvalidConfig("firestore endpoint cannot be a base".into()))?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                self.project_id.as_str(),
                "databases",
                "(default)",
                "documents",
            ])
            .extend(segments);
        Ok(url)
    }

    /// Adds the API key and, if someone is signed in, their ID token.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.query(&[("key", self.api_key.as_str())]);
        match self.user.borrow().as_ref() {
            Some(user) => request.bearer_auth(&user.id_token),
            None => request,
        }
    }

    /// Lists every document currently in `collection`, following page tokens
    /// until the backend stops returning one.
    pub async fn list_documents(
        &self,
        collection: &str,
        page_size: u32,
    ) -> Result<Vec<DocumentRef>, FirebaseError> {
        let url = self.documents_url(&[collection])?;
        let page_size = page_size.max(1).to_string();
        let mut refs = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("pageSize", page_size.clone()),
                ("mask.fieldPaths", "__name__".to_string()),
            ];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            debug!(collection, page = ?page_token, "listing documents");
            let response = self.authorize(self.http.get(url.clone()).query(&query)).send().await?;
            if !response.status().is_success() {
                return Err(api_error(response).await);
            }

            // An empty collection comes back as `{}`.
            let page: ListResponse = response
                .json()
                .await
                .map_err(|e| FirebaseError::Decode(format!("document list: {}", e)))?;

            refs.extend(page.documents.iter().map(|doc| DocumentRef {
                collection: collection.to_string(),
                id: doc.id().to_string(),
            }));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(refs)
    }

    /// Fetches one document; a missing document is `Ok(None)`.
    pub async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, FirebaseError> {
        let url = self.documents_url(&[collection, id])?;
        let response = self.authorize(self.http.get(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        let doc = response
            .json()
            .await
            .map_err(|e| FirebaseError::Decode(format!("document: {}", e)))?;
        Ok(Some(doc))
    }

    /// Deletes one document. Deleting a document that does not exist succeeds.
    pub async fn delete_document(&self, collection: &str, id: &str) -> Result<(), FirebaseError> {
        let url = self.documents_url(&[collection, id])?;
        debug!(collection, id, "deleting document");
        let response = self.authorize(self.http.delete(url)).send().await?;
        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(api_error(response).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockito::{Matcher, Server};

    const DOCS: &str = "/v1/projects/demo/databases/(default)/documents";

    fn client(uri: &str, user: Option<AuthUser>) -> FirestoreClient {
        let (_tx, rx) = watch::channel(user);
        FirestoreClient::new(Client::new(), uri, "demo", "test-key", rx)
    }

    fn doc_json(id: &str) -> String {
        format!(
            r#"{{"name":"projects/demo/databases/(default)/documents/assignments/{}","createTime":"2024-01-01T00:00:00Z"}}"#,
            id
        )
    }

    #[tokio::test]
    async fn test_list_empty_collection() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", format!("{}/assignments", DOCS).as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let refs = client(&server.url(), None)
            .list_documents("assignments", 300)
            .await
            .unwrap();
        m.assert_async().await;
        assert!(refs.is_empty());
    }

    /// Two pages are stitched together through the page token.
    #[tokio::test]
    async fn test_list_follows_page_token() {
        let mut server = Server::new_async().await;
        let path = format!("{}/assignments", DOCS);
        let first = server
            .mock("GET", path.as_str())
            .match_query(Matcher::Regex(
                "^pageSize=2&mask.fieldPaths=__name__&key=test-key$".into(),
            ))
            .with_status(200)
            .with_body(format!(
                r#"{{"documents":[{},{}],"nextPageToken":"p2"}}"#,
                doc_json("a1"),
                doc_json("a2")
            ))
            .create_async()
            .await;
        let second = server
            .mock("GET", path.as_str())
            .match_query(Matcher::UrlEncoded("pageToken".into(), "p2".into()))
            .with_status(200)
            .with_body(format!(r#"{{"documents":[{}]}}"#, doc_json("a3")))
            .create_async()
            .await;

        let refs = client(&server.url(), None)
            .list_documents("assignments", 2)
            .await
            .unwrap();
        first.assert_async().await;
        second.assert_async().await;

        let ids: Vec<_> = refs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "a3"]);
        assert!(refs.iter().all(|r| r.collection == "assignments"));
    }

    #[tokio::test]
    async fn test_list_permission_denied() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", format!("{}/assignments", DOCS).as_str())
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"Missing or insufficient permissions.","status":"PERMISSION_DENIED"}}"#)
            .create_async()
            .await;

        let err = client(&server.url(), None)
            .list_documents("assignments", 300)
            .await
            .unwrap_err();
        m.assert_async().await;
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert!(err.to_string().contains("insufficient permissions"));
    }

    /// A 404 on delete means the document is already gone.
    #[tokio::test]
    async fn test_delete_missing_document_succeeds() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("DELETE", format!("{}/assignments/gone", DOCS).as_str())
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let result = client(&server.url(), None)
            .delete_document("assignments", "gone")
            .await;
        m.assert_async().await;
        assert!(result.is_ok());
    }

    /// Reserved characters in an id stay inside its path segment.
    #[tokio::test]
    async fn test_delete_encodes_document_id() {
        let mut server = Server::new_async().await;
        let encoded = server
            .mock("DELETE", format!("{}/assignments/hw%3F1", DOCS).as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;
        let truncated = server
            .mock("DELETE", format!("{}/assignments/hw", DOCS).as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{}")
            .expect(0)
            .create_async()
            .await;
        let spaced = server
            .mock("DELETE", format!("{}/assignments/week%201", DOCS).as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let firestore = client(&server.url(), None);
        firestore.delete_document("assignments", "hw?1").await.unwrap();
        firestore.delete_document("assignments", "week 1").await.unwrap();

        encoded.assert_async().await;
        truncated.assert_async().await;
        spaced.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_encodes_document_id() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", format!("{}/assignments/a%231", DOCS).as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"name":"projects/demo/databases/(default)/documents/assignments/a#1"}"#,
            )
            .create_async()
            .await;

        let doc = client(&server.url(), None)
            .get_document("assignments", "a#1")
            .await
            .unwrap()
            .unwrap();
        m.assert_async().await;
        assert_eq!(doc.id(), "a#1");
    }

    #[test]
    fn test_unparsable_endpoint_is_invalid_config() {
        let firestore = client("not a url", None);
        let err = firestore.documents_url(&["assignments"]).unwrap_err();
        assert!(matches!(err, FirebaseError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_signed_in_requests_carry_id_token() {
        let user = AuthUser {
            uid: "u1".to_string(),
            email: "u1@example.com".to_string(),
            id_token: "id-token-1".to_string(),
            refresh_token: String::new(),
            expires_at: Utc::now(),
        };
        let mut server = Server::new_async().await;
        let m = server
            .mock("DELETE", format!("{}/assignments/a1", DOCS).as_str())
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer id-token-1")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        client(&server.url(), Some(user))
            .delete_document("assignments", "a1")
            .await
            .unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_document() {
        let mut server = Server::new_async().await;
        let found = server
            .mock("GET", format!("{}/assignments/a1", DOCS).as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"name":"projects/demo/databases/(default)/documents/assignments/a1","fields":{"title":{"stringValue":"Essay"}}}"#,
            )
            .create_async()
            .await;
        let missing = server
            .mock("GET", format!("{}/assignments/zz", DOCS).as_str())
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let firestore = client(&server.url(), None);
        let doc = firestore.get_document("assignments", "a1").await.unwrap().unwrap();
        assert_eq!(doc.id(), "a1");
        assert_eq!(doc.fields["title"]["stringValue"], "Essay");
        assert!(firestore.get_document("assignments", "zz").await.unwrap().is_none());

        found.assert_async().await;
        missing.assert_async().await;
    }
}
