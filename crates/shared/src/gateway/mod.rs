mod kakaopay;
mod wire;

pub use self::kakaopay::KakaoPayClient;
pub use self::wire::ProviderError;
