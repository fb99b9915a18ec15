use thiserror::Error;

/// Ошибки обращения к внешним сервисам (бэкенд, RSS, Google).
///
/// Маршруты сами решают, какой HTTP-статус отдать клиенту; детали ошибки
/// только логируются и наружу не уходят.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Сервис ответил статусом не из диапазона 2xx.
    #[error("backend responded with status: {status}")]
    Status { status: u16 },
    /// Запрос не дошёл до сервиса (DNS, соединение, таймаут).
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    /// Тело ответа не удалось разобрать.
    #[error("invalid response body: {0}")]
    Decode(String),
    /// Сервис ответил 2xx, но сообщил об ошибке в теле.
    #[error("request rejected: {0}")]
    Rejected(String),
    /// Для внешнего сервиса не задан ключ или адрес.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    /// RSS-лента не разбирается как XML нужной формы.
    #[error("invalid feed: {0}")]
    Feed(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err)
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;
