use thiserror::Error;

/// 应用程序错误类型
///
/// 只用于"形状"错误（文件、配置、数据结构）。题目内容本身的质量问题
/// 不会产生错误，而是表现为更少的题目或空选项。
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 输入数据结构错误
    #[error("数据错误: {0}")]
    Data(#[from] DataError),
    /// 内置正则表达式编译失败
    #[error("正则表达式错误: {0}")]
    Pattern(#[from] regex::Error),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML 配置文件解析失败
    #[error("配置文件 {path} 解析失败: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 配置值不合法
    #[error("配置项 {key} 的值 '{value}' 不合法")]
    InvalidValue { key: String, value: String },
}

/// 输入数据结构错误
#[derive(Debug, Error)]
pub enum DataError {
    /// 抽取结果不是合法的 JSON 文档
    #[error("抽取结果 JSON 解析失败: {source}")]
    InvalidExtraction {
        #[source]
        source: serde_json::Error,
    },
    /// 抽取结果中缺少 text_blocks 数组
    #[error("抽取结果中缺少 text_blocks 数组")]
    MissingTextBlocks,
    /// 序列化输出记录失败
    #[error("序列化记录失败: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建目录不存在错误
    pub fn directory_not_found(path: impl Into<String>) -> Self {
        AppError::File(FileError::DirectoryNotFound { path: path.into() })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
