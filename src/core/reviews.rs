use crate::domain::model::Review;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewSummary {
    pub count: usize,
    /// None when nobody has reviewed the restaurant yet.
    pub average: Option<f64>,
}

impl ReviewSummary {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        if reviews.is_empty() {
            return Self {
                count: 0,
                average: None,
            };
        }
        let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
        Self {
            count: reviews.len(),
            average: Some(f64::from(total) / reviews.len() as f64),
        }
    }
}
