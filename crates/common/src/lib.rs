pub mod types;
pub mod utils;
pub mod pagination;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn detail_serializes_under_detail_key() {
        let d = types::Detail::new("Car deleted successfully");
        assert_eq!(d.detail, "Car deleted successfully");
    }
}
