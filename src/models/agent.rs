/// 评估器身份（封闭集合）
///
/// 新增评估器时需要同时增加枚举项和路由规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorIdentity {
    /// 剧本评审：叙事与创作技巧
    ScriptReviewer,
    /// 影响评估：社会、文化影响与敏感性
    ImpactAgent,
}

impl EvaluatorIdentity {
    /// 所有评估器
    pub const ALL: [EvaluatorIdentity; 2] = [Self::ScriptReviewer, Self::ImpactAgent];

    /// 获取标识字符串（与 JSON 输出一致）
    pub fn as_str(self) -> &'static str {
        match self {
            EvaluatorIdentity::ScriptReviewer => "script_reviewer",
            EvaluatorIdentity::ImpactAgent => "impact_agent",
        }
    }

    /// 获取显示名称
    pub fn name(self) -> &'static str {
        match self {
            EvaluatorIdentity::ScriptReviewer => "Script Reviewer",
            EvaluatorIdentity::ImpactAgent => "Impact Agent",
        }
    }
}

impl std::fmt::Display for EvaluatorIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_matches_wire_name() {
        for identity in EvaluatorIdentity::ALL {
            let json = serde_json::to_string(&identity).unwrap();
            assert_eq!(json, format!("\"{}\"", identity.as_str()));
        }
    }

    #[test]
    fn test_identity_serializes_as_snake_case() {
        let json = serde_json::to_string(&EvaluatorIdentity::ImpactAgent).unwrap();
        assert_eq!(json, "\"impact_agent\"");
    }
}
