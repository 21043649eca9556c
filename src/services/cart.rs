//! # 세션 카트 (현재 훈련 세션 초안)
//!
//! 방문자가 고른 게임 ID 목록을 세션 스토어의 `"cart"` 키에 순서대로 저장합니다.
//! 같은 게임은 한 번만 담깁니다. 이미 있는 게임을 다시 담으면 아무 일도 일어나지 않습니다.
//!
//! DB에서 게임이 삭제되거나 숨겨지면 카트를 읽는 쪽에서 [`Cart::retain`]으로
//! 그 ID를 걷어내고 다시 저장합니다.

use tower_sessions::Session;

use crate::error::AppError;

pub const CART_KEY: &str = "cart";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    game_ids: Vec<String>,
}

impl Cart {
    /// 세션에서 카트를 읽습니다. 없으면 빈 카트
    pub async fn load(session: &Session) -> Result<Self, AppError> {
        let game_ids: Vec<String> = session.get(CART_KEY).await?.unwrap_or_default();
        Ok(Cart { game_ids })
    }

    pub async fn save(&self, session: &Session) -> Result<(), AppError> {
        session.insert(CART_KEY, &self.game_ids).await?;
        Ok(())
    }

    /// 게임을 끝에 추가합니다. 이미 있으면 false
    pub fn add(&mut self, game_id: &str) -> bool {
        if self.contains(game_id) {
            return false;
        }
        self.game_ids.push(game_id.to_string());
        true
    }

    /// 게임을 뺍니다. 없었으면 false
    pub fn remove(&mut self, game_id: &str) -> bool {
        let before = self.game_ids.len();
        self.game_ids.retain(|id| id != game_id);
        self.game_ids.len() != before
    }

    /// `keep`이 false인 ID를 버립니다. 하나라도 버렸으면 true
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) -> bool {
        let before = self.game_ids.len();
        self.game_ids.retain(|id| keep(id));
        self.game_ids.len() != before
    }

    pub fn clear(&mut self) {
        self.game_ids.clear();
    }

    pub fn contains(&self, game_id: &str) -> bool {
        self.game_ids.iter().any(|id| id == game_id)
    }

    pub fn len(&self) -> usize {
        self.game_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.game_ids.is_empty()
    }

    pub fn game_ids(&self) -> &[String] {
        &self.game_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_twice_keeps_one_entry() {
        let mut cart = Cart::default();
        assert!(cart.add("a"));
        assert!(cart.add("b"));
        assert!(!cart.add("a"));
        assert_eq!(cart.game_ids(), ["a", "b"]);
    }

    #[test]
    fn remove_reports_whether_anything_changed() {
        let mut cart = Cart::default();
        cart.add("a");
        assert!(!cart.remove("missing"));
        assert!(cart.remove("a"));
        assert!(cart.is_empty());
    }

    #[test]
    fn retain_drops_unknown_ids_and_keeps_order() {
        let mut cart = Cart::default();
        cart.add("a");
        cart.add("gone");
        cart.add("b");
        assert!(cart.retain(|id| id != "gone"));
        assert_eq!(cart.game_ids(), ["a", "b"]);
        assert!(!cart.retain(|_| true));
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = Cart::default();
        cart.add("a");
        cart.add("b");
        cart.clear();
        assert_eq!(cart.len(), 0);
    }
}
