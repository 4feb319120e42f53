//! 파일 단위 파싱 컨텍스트

/// 한 파일을 읽는 동안 라인 사이에 전달되는 상태
///
/// 파일마다 새로 생성되며 다른 파일이나 다른 벤더와 공유되지 않습니다.
/// 현재는 TP-Link 헤더의 `Time = <date>` 값만 보관합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    current_date: Option<String>,
}

impl ParseContext {
    /// 빈 컨텍스트를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 헤더에서 읽은 현재 날짜
    pub fn current_date(&self) -> Option<&str> {
        self.current_date.as_deref()
    }

    /// 이후 라인에 적용할 날짜를 설정합니다. 나중 헤더가 앞의 값을 덮어씁니다.
    pub fn set_current_date(&mut self, date: impl Into<String>) {
        self.current_date = Some(date.into());
    }

    /// 새 파일 시작 시 상태를 초기화합니다.
    pub fn reset(&mut self) {
        self.current_date = None;
    }
}
