//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{RejectReason, ValueObjectError};

/// 参加処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// 表示名が不正（空、または長すぎる）
    #[error("Invalid display name: {0}")]
    InvalidName(#[from] ValueObjectError),

    /// 既に参加済みの接続からの join
    #[error("Connection has already joined")]
    AlreadyJoined,
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// 本文が不正（空、または長すぎる）
    #[error("Invalid message body: {0}")]
    InvalidMessage(#[from] ValueObjectError),

    /// 未参加の接続からの送信
    #[error("Sender has not joined")]
    NotJoined,
}

/// 入力中シグナルのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypingError {
    /// 未参加の接続からのシグナル
    #[error("Sender has not joined")]
    NotJoined,
}

impl From<JoinError> for RejectReason {
    fn from(error: JoinError) -> Self {
        match error {
            JoinError::InvalidName(_) => RejectReason::InvalidName,
            JoinError::AlreadyJoined => RejectReason::AlreadyJoined,
        }
    }
}

impl From<SendMessageError> for RejectReason {
    fn from(error: SendMessageError) -> Self {
        match error {
            SendMessageError::InvalidMessage(_) => RejectReason::InvalidMessage,
            SendMessageError::NotJoined => RejectReason::NotJoined,
        }
    }
}

impl From<TypingError> for RejectReason {
    fn from(error: TypingError) -> Self {
        match error {
            TypingError::NotJoined => RejectReason::NotJoined,
        }
    }
}
