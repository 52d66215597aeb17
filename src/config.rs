use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::model::{ConfigError, Strategy};

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub category: String,
    pub path: PathBuf,
}

/// Keyword lists per scored strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordConfig {
    pub fear_appeal: Vec<String>,
    pub scientific_authority: Vec<String>,
    pub vision_desire: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CodingConfig {
    pub sources: Vec<SourceConfig>,
    pub output: PathBuf,
    pub headline_columns: Vec<String>,
    pub keywords: KeywordConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub input: PathBuf,
    pub distribution_output: PathBuf,
    pub summary_output: PathBuf,
    pub corpus_dir: PathBuf,
    pub category_columns: Vec<String>,
    pub strategy_columns: Vec<String>,
    pub text_columns: Vec<String>,
    pub category_labels: HashMap<String, String>,
    pub strategy_labels: HashMap<String, String>,
    pub unclassified_labels: Vec<String>,
    /// Column order of the stacked bars.
    pub strategy_order: Vec<String>,
    /// Words removed from the word-cloud corpus.
    pub stopwords: Vec<String>,
}

/// What to do with a cell the value map does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedPolicy {
    /// Keep the raw value and try to read it as a number.
    Passthrough,
    /// Replace it with 0.
    Zero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueMapping {
    Likert,
    Gender,
    Grade,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariableConfig {
    /// Substring searched for in the raw column headers.
    pub keyword: String,
    pub name: String,
    pub mapping: ValueMapping,
    pub unmapped: UnmappedPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttentionCheckConfig {
    pub keyword: String,
    pub required: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub variables: Vec<VariableConfig>,
    pub attention_check: AttentionCheckConfig,
    pub likert_map: HashMap<String, i64>,
    pub gender_map: HashMap<String, i64>,
    pub grade_map: HashMap<String, i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub coding: CodingConfig,
    pub charts: ChartConfig,
    pub survey: SurveyConfig,
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn labels(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn codes(pairs: &[(&str, i64)]) -> HashMap<String, i64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

impl KeywordConfig {
    pub fn keywords_for(&self, strategy: Strategy) -> &[String] {
        match strategy {
            Strategy::FearAppeal => &self.fear_appeal,
            Strategy::ScientificAuthority => &self.scientific_authority,
            Strategy::VisionDesire => &self.vision_desire,
            Strategy::Unclassified => &[],
        }
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            fear_appeal: strings(&[
                "苦", "痛", "病", "弱", "死", "亡", "笨", "愚", "黑", "老", "丑", "惨",
                "自杀", "枯黄", "憔悴", "失业", "落伍", "淘汰", "危险", "救命", "救星",
            ]),
            scientific_authority: strings(&[
                "医", "药", "科学", "化学", "物理", "博士", "专家", "发明", "化验",
                "德国", "美国", "西洋", "卫生", "原理", "研究", "证明", "确有", "功效",
            ]),
            vision_desire: strings(&[
                "美", "白", "嫩", "香", "滑", "摩登", "时髦",
                "聪明", "智慧", "神童", "天才", "强", "健", "壮",
                "升官", "发财", "名利", "富", "贵", "成功", "速成", "学位", "毕业",
            ]),
        }
    }
}

impl Default for CodingConfig {
    fn default() -> Self {
        let source = |category: &str, file: &str| SourceConfig {
            category: category.to_string(),
            path: PathBuf::from("data/raw_ads").join(file),
        };
        Self {
            sources: vec![
                source("Beauty", "申报_美容_数据.xlsx"),
                source("Health", "申报_补脑_数据.xlsx"),
                source("Education", "申报_函授_数据.xlsx"),
            ],
            output: PathBuf::from("data/encoded_ads.csv"),
            headline_columns: strings(&["完整标题", "Headline"]),
            keywords: KeywordConfig::default(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/encoded_ads.csv"),
            distribution_output: PathBuf::from("output/strategy_distribution.csv"),
            summary_output: PathBuf::from("output/strategy_distribution.json"),
            corpus_dir: PathBuf::from("output/corpus"),
            category_columns: strings(&["Category", "关键词"]),
            strategy_columns: strings(&["Strategy", "预编码结果"]),
            text_columns: strings(&["完整标题", "Headline"]),
            category_labels: labels(&[
                ("美容", "Beauty"),
                ("补脑", "Health"),
                ("神经衰弱", "Health"),
                ("函授", "Education"),
            ]),
            strategy_labels: labels(&[
                ("1_恐吓", "Fear Appeal"),
                ("2_科学", "Scientific Authority"),
                ("3_愿景", "Vision/Desire"),
                ("1_Fear_Appeal", "Fear Appeal"),
                ("2_Scientific_Authority", "Scientific Authority"),
                ("3_Vision_Desire", "Vision/Desire"),
            ]),
            unclassified_labels: strings(&["0_未分类", "0_Unclassified"]),
            strategy_order: strings(&["Fear Appeal", "Scientific Authority", "Vision/Desire"]),
            stopwords: strings(&[
                "之", "的", "了", "在", "是", "有", "和", "大", "及", "与", "等", "或", "此", "亦", "即", "我们",
                "可以", "这个", "一个", "价", "元", "号", "路", "房", "药", "部", "处", "为", "以", "注意", "办法",
                "无不", "不论", "一切", "各种", "一种", "二种", "三种", "几种", "因为", "所以", "许多", "常常", "非常", "十分",
                "比较", "不过", "但是", "若是", "或者", "以及", "上海", "上海市", "申报", "广告", "发行", "总", "分", "洋行",
                "公司", "启", "谨启", "启事", "电话", "地址", "经理", "售", "试服", "代售", "出售", "制造", "出品", "创制",
                "诸君", "一律", "同时", "赠品", "大赠品", "免费", "函索", "简章", "索寄", "样本", "大廉", "价目", "老牌", "名牌",
                "唯一", "第一", "无上", "最高", "最优", "特别", "特殊", "有名", "著名", "日", "月", "年", "星期", "礼拜",
                "十二月", "十一月", "一月", "二月", "三月", "四月", "五月", "廿日", "本日", "现在", "冬季", "冬令", "新春",
                "开幕", "举行", "本埠", "外埠", "周年", "纪念", "大减价", "廉价", "优待", "本校", "本院", "本社", "函授", "学校",
                "学社", "书局", "印书馆", "中华书局", "商务印书馆", "商务", "大东书局", "教育", "局", "馆", "所", "社", "科",
                "级", "员", "生", "师", "私立", "公立", "招生", "招收", "附设", "开设", "开学", "报名", "通告", "章程",
                "新生", "注册", "毕业", "肄业", "专修", "讲义", "学费", "教授", "同学", "大学", "美容", "美容品", "美容院",
                "补脑", "脑汁", "补血", "神经衰弱", "衰弱", "神经", "艾罗", "艾罗补", "中法", "大药房", "药房", "五洲", "先施",
                "雅霜", "韦廉士", "安祺儿", "奇药", "妙品", "圣药", "灵药", "特效", "功效", "功能", "效力", "良药", "大补",
                "补剂", "应用", "秘诀", "秘密", "法", "剂", "丸", "水", "膏", "油", "露", "片", "几许", "强身", "健体",
                "卫生", "滋补", "服用", "精制", "改良", "发明", "保卫", "救星", "人丹",
            ]),
        }
    }
}

impl Default for AttentionCheckConfig {
    fn default() -> Self {
        Self {
            keyword: "不是机器人".to_string(),
            required: "比较符合".to_string(),
        }
    }
}

impl Default for SurveyConfig {
    fn default() -> Self {
        let latent = |keyword: &str, name: &str| VariableConfig {
            keyword: keyword.to_string(),
            name: name.to_string(),
            mapping: ValueMapping::Likert,
            unmapped: UnmappedPolicy::Passthrough,
        };
        let mut variables = vec![
            VariableConfig {
                keyword: "您的性别".to_string(),
                name: "Gender".to_string(),
                mapping: ValueMapping::Gender,
                unmapped: UnmappedPolicy::Zero,
            },
            VariableConfig {
                keyword: "您的年级".to_string(),
                name: "Grade".to_string(),
                mapping: ValueMapping::Grade,
                unmapped: UnmappedPolicy::Zero,
            },
        ];
        variables.extend([
            latent("关注社交媒体", "Anx_Face_1"),
            latent("外貌不够出众", "Anx_Face_2"),
            latent("镜子里的自己", "Anx_Face_3"),
            latent("同学考证", "Anx_Know_1"),
            latent("技能不够用", "Anx_Know_2"),
            latent("担心毕业", "Anx_Know_3"),
            latent("精神疲惫", "Anx_Health_1"),
            latent("过度的脑力", "Anx_Health_2"),
            latent("高强度的竞争", "Anx_Health_3"),
            latent("皮肤黑被丈夫", "Hist_Face_1"),
            latent("容貌决定命运", "Hist_Face_2"),
            latent("如果这款产品", "Hist_Face_3"),
            latent("愚笨可变聪明", "Hist_Brain_1"),
            latent("优胜劣汰", "Hist_Brain_2"),
            latent("购买尝试", "Hist_Brain_3"),
            latent("自修英文", "Hist_Know_1"),
            latent("知识改变命运", "Hist_Know_2"),
            latent("速成", "Hist_Know_3"),
        ]);

        Self {
            input: PathBuf::from("data/raw_survey.xlsx"),
            output: PathBuf::from("data/smartpls_data.csv"),
            variables,
            attention_check: AttentionCheckConfig::default(),
            likert_map: codes(&[
                ("完全不符合", 1), ("比较不符合", 2), ("一般", 3), ("比较符合", 4), ("完全符合", 5),
                ("完全不同意", 1), ("不太同意", 2), ("不同意", 2), ("同意", 4), ("完全同意", 5),
                ("1", 1), ("2", 2), ("3", 3), ("4", 4), ("5", 5),
            ]),
            gender_map: codes(&[("A.男", 1), ("男", 1), ("B.女", 2), ("女", 2)]),
            grade_map: codes(&[
                ("A.大一", 1), ("B.大二", 2), ("C.大三", 3), ("D.大四", 4), ("E.研究生及以上", 5),
            ]),
        }
    }
}

impl SurveyConfig {
    pub fn value_map(&self, mapping: ValueMapping) -> &HashMap<String, i64> {
        match mapping {
            ValueMapping::Likert => &self.likert_map,
            ValueMapping::Gender => &self.gender_map,
            ValueMapping::Grade => &self.grade_map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: AppConfig = serde_json::from_str(
            r#"{ "coding": { "output": "out/merged.csv" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.coding.output, PathBuf::from("out/merged.csv"));
        assert_eq!(cfg.coding.sources.len(), 3);
        assert_eq!(cfg.coding.keywords.fear_appeal.len(), 21);
        assert_eq!(cfg.survey.variables.len(), 20);
        assert!(cfg.charts.stopwords.iter().any(|w| w == "商务印书馆"));
    }

    #[test]
    fn variable_policies_deserialize() {
        let v: VariableConfig = serde_json::from_str(
            r#"{ "keyword": "年龄", "name": "Age", "mapping": "likert", "unmapped": "zero" }"#,
        )
        .unwrap();
        assert_eq!(v.mapping, ValueMapping::Likert);
        assert_eq!(v.unmapped, UnmappedPolicy::Zero);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_config("definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
