use sqlx::FromRow;

/// One catalog row. Price and weight arrive as floats regardless of the
/// storage type; dimensions are integral units.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Product {
    pub id_product: i64,
    pub description: String,
    pub price: f64,
    pub width: i32,
    pub height: i32,
    pub length: i32,
    pub weight: f64,
}

impl Product {
    /// Each dimension is scaled by 1/100 before multiplying.
    pub fn volume(&self) -> f64 {
        (self.width as f64 / 100.0) * (self.height as f64 / 100.0) * (self.length as f64 / 100.0)
    }

    /// Zero volume yields zero density.
    pub fn density(&self) -> f64 {
        let volume = self.volume();
        if volume == 0.0 {
            return 0.0;
        }
        self.weight / volume
    }
}
