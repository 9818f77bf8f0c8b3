use mongodb::{bson::doc, Database, IndexModel};

use crate::error::TrackerError;

pub async fn ensure_indexes(db: &Database) -> Result<(), TrackerError> {
    // token_prices: most_recent scans by token, newest first
    {
        let col = db.collection::<mongodb::bson::Document>("token_prices");
        let model = IndexModel::builder()
            .keys(doc! { "token": 1, "last_update": -1 })
            .build();

        col.create_index(model, None).await?;
    }

    // price_alerts: matcher scans untriggered rules per token
    {
        let col = db.collection::<mongodb::bson::Document>("price_alerts");
        let model = IndexModel::builder()
            .keys(doc! { "token": 1, "triggered": 1 })
            .build();

        col.create_index(model, None).await?;
    }

    Ok(())
}
