use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use tokio::sync::watch;

use super::auth::AuthUser;
use super::error::{api_error, FirebaseError};

/// Metadata of one stored object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    pub name: String,
    pub bucket: String,
    #[serde(default)]
    pub content_type: Option<String>,
    /// Bytes, sent as a string.
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

/// One page of a listing: objects plus the "directories" below the prefix.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectListing {
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub items: Vec<ObjectRef>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ObjectRef {
    pub name: String,
    pub bucket: String,
}

/// Blob store client for the Firebase Storage v0 REST API.
pub struct StorageClient {
    http: Client,
    endpoint: String,
    bucket: String,
    user: watch::Receiver<Option<AuthUser>>,
}

impl StorageClient {
    pub(crate) fn new(
        http: Client,
        endpoint: &str,
        bucket: &str,
        user: watch::Receiver<Option<AuthUser>>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.to_string(),
            bucket: bucket.to_string(),
            user,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn objects_url(&self) -> Result<Url, FirebaseError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| FirebaseError::InvalidConfig(format!("storage endpoint: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| FirebaseError::InvalidConfig("storage endpoint cannot be a base".into()))?
            .pop_if_empty()
            .extend(["v0", "b", self.bucket.as_str(), "o"]);
        Ok(url)
    }

    /// The object's full path becomes a single segment, so `/` is sent as `%2F`.
    fn object_url(&self, path: &str) -> Result<Url, FirebaseError> {
        let mut url = self.objects_url()?;
        url.path_segments_mut()
            .map_err(|_| FirebaseError::InvalidConfig("storage endpoint cannot be a base".into()))?
            .push(path);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.user.borrow().as_ref() {
            Some(user) => request.header("Authorization", format!("Firebase {}", user.id_token)),
            None => request,
        }
    }

    /// Lists objects and sub-prefixes directly under `prefix`.
    pub async fn list_objects(&self, prefix: &str) -> Result<ObjectListing, FirebaseError> {
        let url = self.objects_url()?;
        let request = self
            .http
            .get(url)
            .query(&[("prefix", prefix), ("delimiter", "/")]);
        let response = self.authorize(request).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| FirebaseError::Decode(format!("object listing: {}", e)))
    }

    /// Returns the object's metadata, or `None` when there is no such object.
    pub async fn get_metadata(&self, path: &str) -> Result<Option<ObjectMetadata>, FirebaseError> {
        let response = self.authorize(self.http.get(self.object_url(path)?)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        let meta = response
            .json()
            .await
            .map_err(|e| FirebaseError::Decode(format!("object metadata: {}", e)))?;
        Ok(Some(meta))
    }

    pub async fn delete_object(&self, path: &str) -> Result<(), FirebaseError> {
        let response = self
            .authorize(self.http.delete(self.object_url(path)?))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(api_error(response).await)
        }
    }

    /// URL that streams the object's bytes (`alt=media`).
    pub fn download_url(&self, path: &str) -> Result<String, FirebaseError> {
        let mut url = self.object_url(path)?;
        url.query_pairs_mut().append_pair("alt", "media");
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client(uri: &str) -> StorageClient {
        let (_tx, rx) = watch::channel(None);
        StorageClient::new(Client::new(), uri, "demo.appspot.com", rx)
    }

    #[test]
    fn test_download_url_encodes_path() {
        let storage = client("https://firebasestorage.googleapis.com");
        let url = storage.download_url("avatars/u1/photo one.png").unwrap();
        assert_eq!(
            url,
            "https://firebasestorage.googleapis.com/v0/b/demo.appspot.com/o/avatars%2Fu1%2Fphoto%20one.png?alt=media"
        );
    }

    #[tokio::test]
    async fn test_list_objects() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/v0/b/demo.appspot.com/o")
            .match_query(Matcher::UrlEncoded("prefix".into(), "avatars/".into()))
            .with_status(200)
            .with_body(
                r#"{"prefixes":["avatars/u1/"],"items":[{"name":"avatars/default.png","bucket":"demo.appspot.com"}]}"#,
            )
            .create_async()
            .await;

        let listing = client(&server.url()).list_objects("avatars/").await.unwrap();
        m.assert_async().await;
        assert_eq!(listing.prefixes, vec!["avatars/u1/"]);
        assert_eq!(listing.items.len(), 1);
        assert_eq!(listing.items[0].name, "avatars/default.png");
    }

    #[tokio::test]
    async fn test_metadata_missing_object() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/v0/b/demo.appspot.com/o/avatars%2Fnobody.png")
            .with_status(404)
            .with_body(r#"{"error":{"code":404,"message":"Not Found."}}"#)
            .create_async()
            .await;

        let meta = client(&server.url())
            .get_metadata("avatars/nobody.png")
            .await
            .unwrap();
        m.assert_async().await;
        assert!(meta.is_none());
    }
}
