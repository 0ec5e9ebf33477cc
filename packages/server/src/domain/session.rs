//! コネクション毎のセッション状態
//!
//! WebSocket コネクションはログインに成功するまでどの参加者にも
//! 紐づきません。紐づけ（バインディング）はコネクションを処理する
//! タスクのローカル状態として保持され、以降のイベントの送信者は
//! ペイロードの申告ではなくこのバインディングから決定されます。

use super::value_object::{ParticipantId, RoomId};

/// ログイン済みコネクションの紐づけ先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionBinding {
    /// 参加中のルーム
    pub room_id: RoomId,
    /// コネクションを所有する参加者
    pub participant_id: ParticipantId,
}

/// コネクションのセッション状態
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// ログイン前（login 以外のイベントは拒否される）
    #[default]
    Unbound,
    /// ログイン済み
    Bound(SessionBinding),
}

impl SessionState {
    /// バインディングを設定し、置き換えられた旧バインディングを返す
    ///
    /// 同一コネクション上での再ログインは許可されます。別のルームへの
    /// 再ログインであれば戻り値の旧バインディングでログに残せます。
    pub fn bind(&mut self, binding: SessionBinding) -> Option<SessionBinding> {
        let previous = std::mem::replace(self, SessionState::Bound(binding));
        match previous {
            SessionState::Bound(old) => Some(old),
            SessionState::Unbound => None,
        }
    }

    /// 現在のバインディングを取得
    pub fn binding(&self) -> Option<&SessionBinding> {
        match self {
            SessionState::Bound(binding) => Some(binding),
            SessionState::Unbound => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(room: &str, participant: &str) -> SessionBinding {
        SessionBinding {
            room_id: RoomId::new(room.to_string()).unwrap(),
            participant_id: ParticipantId::new(participant.to_string()).unwrap(),
        }
    }

    #[test]
    fn test_new_session_is_unbound() {
        // テスト項目: 初期状態のセッションはバインディングを持たない
        // given (前提条件):
        let session = SessionState::default();

        // when (操作) / then (期待する結果):
        assert_eq!(session.binding(), None);
    }

    #[test]
    fn test_bind_sets_binding() {
        // テスト項目: バインドでセッションがログイン済みになる
        // given (前提条件):
        let mut session = SessionState::default();

        // when (操作):
        let previous = session.bind(binding("org-1", "ann"));

        // then (期待する結果):
        assert_eq!(previous, None);
        assert_eq!(session.binding(), Some(&binding("org-1", "ann")));
    }

    #[test]
    fn test_rebind_returns_previous_binding() {
        // テスト項目: 再バインドで旧バインディングが返される
        // given (前提条件):
        let mut session = SessionState::default();
        session.bind(binding("org-1", "ann"));

        // when (操作): 別ルームへ再ログイン
        let previous = session.bind(binding("org-2", "ann"));

        // then (期待する結果):
        assert_eq!(previous, Some(binding("org-1", "ann")));
        assert_eq!(session.binding(), Some(&binding("org-2", "ann")));
    }
}
