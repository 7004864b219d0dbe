//! 検索URLの組み立て

use url::form_urlencoded;

use super::dates::DATE_FORMAT;
use super::types::{DayPair, SearchRequest};

/// Booking 検索結果ページ（繁体字中国語）
pub const BOOKING_SEARCH_URL: &str = "https://www.booking.com/searchresults.zh-tw.html";

/// 大人2名・1室・子供なし・レジャー・TWD
const FIXED_PARAMS: [(&str, &str); 5] = [
    ("group_adults", "2"),
    ("no_rooms", "1"),
    ("group_children", "0"),
    ("sb_travel_purpose", "leisure"),
    ("selected_currency", "TWD"),
];

/// 地域と1泊分の日付から検索リクエストを作る
///
/// パラメータ順は固定なので、同じ入力からは常に同じURLになる。
pub fn build_request(base_url: &str, location: &str, day_pair: DayPair) -> SearchRequest {
    let check_in = day_pair.check_in().format(DATE_FORMAT).to_string();
    let check_out = day_pair.check_out().format(DATE_FORMAT).to_string();

    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("ss", location)
        .append_pair("checkin", &check_in)
        .append_pair("checkout", &check_out);
    for (key, value) in FIXED_PARAMS {
        query.append_pair(key, value);
    }

    let target_url = format!("{}?{}", base_url, query.finish());
    SearchRequest::new(location.to_string(), day_pair, target_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn pair(y: i32, m: u32, d: u32) -> DayPair {
        DayPair::starting(NaiveDate::from_ymd_opt(y, m, d).unwrap()).unwrap()
    }

    #[test]
    fn test_encodes_location_and_fixed_params_in_order() {
        let request = build_request(BOOKING_SEARCH_URL, "高雄", pair(2025, 1, 1));

        assert_eq!(
            request.target_url(),
            "https://www.booking.com/searchresults.zh-tw.html?ss=%E9%AB%98%E9%9B%84\
             &checkin=2025-01-01&checkout=2025-01-02&group_adults=2&no_rooms=1\
             &group_children=0&sb_travel_purpose=leisure&selected_currency=TWD"
        );
        assert_eq!(request.location(), "高雄");
        assert_eq!(request.day_pair(), pair(2025, 1, 1));
    }

    #[test]
    fn test_is_deterministic() {
        let a = build_request(BOOKING_SEARCH_URL, "Taipei City", pair(2025, 6, 30));
        let b = build_request(BOOKING_SEARCH_URL, "Taipei City", pair(2025, 6, 30));
        assert_eq!(a.target_url().as_bytes(), b.target_url().as_bytes());
        assert_eq!(a, b);
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        let request = build_request("http://localhost/search", "A&B=C d", pair(2025, 6, 30));
        assert!(request
            .target_url()
            .starts_with("http://localhost/search?ss=A%26B%3DC+d&checkin=2025-06-30&checkout=2025-07-01&"));
    }
}
