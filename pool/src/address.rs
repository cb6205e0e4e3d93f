//! Thin re-export of the consensus-layer address validator. Every accepted
//! contribution's address must pass this check before it is recorded.

pub use wallet::address::Address;

pub fn validate(address: &str) -> bool {
    Address::validate(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_address() {
        assert!(!validate(""));
    }
}
