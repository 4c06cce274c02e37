//! MongoDB-backed [`AssetStore`].
//!
//! Collection `media.assets` with a unique index on `sha256`.

use async_trait::async_trait;
use bson::{doc, DateTime as BsonDateTime};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Asset, NewAssetFields};
use crate::error::{MediaError, MediaResult};
use crate::ports::outbound::AssetStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AssetDocument {
    #[serde(rename = "_id")]
    id: String,
    sha256: String,
    filename: String,
    content_type: String,
    category_name: String,
    size_bytes: i64,
    width: Option<i64>,
    height: Option<i64>,
    storage_key: String,
    pin_status: String,
    cid: Option<String>,
    gateway_url: Option<String>,
    pin_error: Option<String>,
    pin_attempts: i64,
    created_at: BsonDateTime,
    updated_at: BsonDateTime,
}

impl From<&Asset> for AssetDocument {
    fn from(a: &Asset) -> Self {
        Self {
            id: a.id.to_string(),
            sha256: a.sha256.clone(),
            filename: a.filename.clone(),
            content_type: a.content_type.clone(),
            category_name: a.category_name.clone(),
            size_bytes: a.size_bytes as i64,
            width: a.width.map(|w| w as i64),
            height: a.height.map(|h| h as i64),
            storage_key: a.storage_key.clone(),
            pin_status: a.pin_status.clone(),
            cid: a.cid.clone(),
            gateway_url: a.gateway_url.clone(),
            pin_error: a.pin_error.clone(),
            pin_attempts: a.pin_attempts as i64,
            created_at: BsonDateTime::from_chrono(a.created_at),
            updated_at: BsonDateTime::from_chrono(a.updated_at),
        }
    }
}

impl TryFrom<AssetDocument> for Asset {
    type Error = MediaError;

    fn try_from(doc: AssetDocument) -> Result<Self, Self::Error> {
        Ok(Asset {
            id: Uuid::parse_str(&doc.id).map_err(|e| MediaError::Database(e.to_string()))?,
            sha256: doc.sha256,
            filename: doc.filename,
            content_type: doc.content_type,
            category_name: doc.category_name,
            size_bytes: doc.size_bytes as u64,
            width: doc.width.map(|w| w as u32),
            height: doc.height.map(|h| h as u32),
            storage_key: doc.storage_key,
            pin_status: doc.pin_status,
            cid: doc.cid,
            gateway_url: doc.gateway_url,
            pin_error: doc.pin_error,
            pin_attempts: doc.pin_attempts as u32,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        })
    }
}

pub struct MongoAssetStore {
    collection: Collection<AssetDocument>,
}

impl MongoAssetStore {
    pub fn new(database: &Database) -> Self {
        Self { collection: database.collection("media.assets") }
    }

    pub async fn ensure_indexes(&self) -> MediaResult<()> {
        let unique_sha256 = IndexModel::builder()
            .keys(doc! { "sha256": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_indexes(vec![unique_sha256]).await?;
        Ok(())
    }
}

#[async_trait]
impl AssetStore for MongoAssetStore {
    async fn find_or_create_pending(&self, fields: &NewAssetFields) -> MediaResult<(Asset, bool)> {
        let document = AssetDocument::from(&Asset::new(fields));

        match self.collection.insert_one(&document).await {
            Ok(_) => Ok((document.try_into()?, true)),
            Err(e) if is_duplicate_key(&e) => {
                let existing = self
                    .collection
                    .find_one(doc! { "sha256": &fields.sha256 })
                    .await?
                    .ok_or_else(|| MediaError::Database("duplicate key race with no winning row".to_string()))?;
                Ok((existing.try_into()?, false))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn mark_pinned(&self, id: Uuid, cid: String, gateway_url: String) -> MediaResult<Asset> {
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": id.to_string() },
                doc! { "$set": {
                    "pin_status": "pinned",
                    "cid": &cid,
                    "gateway_url": &gateway_url,
                    "updated_at": BsonDateTime::now(),
                } },
            )
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| MediaError::NotFound(id.to_string()))?;
        updated.try_into()
    }

    async fn mark_failed(&self, id: Uuid, error: String) -> MediaResult<Asset> {
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": id.to_string() },
                doc! { "$set": {
                    "pin_status": "failed",
                    "pin_error": &error,
                    "updated_at": BsonDateTime::now(),
                }, "$inc": { "pin_attempts": 1i64 } },
            )
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| MediaError::NotFound(id.to_string()))?;
        updated.try_into()
    }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    use mongodb::error::ErrorKind;
    matches!(*e.kind, ErrorKind::Write(mongodb::error::WriteFailure::WriteError(ref we)) if we.code == 11000)
}
