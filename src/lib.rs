//! SQL 作业提交与评分引擎后端服务
//!
//! 基于 Actix Web 构建，负责提交生命周期、SQL 运行评估、细则评分与成绩发布。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层（评分引擎）
//! - `storage`: 数据存储层（内存 / SeaORM，Moka 目录缓存）
//! - `utils`: 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
