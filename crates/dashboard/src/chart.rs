/// 指数走势图的固定点数
pub const WINDOW: usize = 7;

pub const DEFAULT_POINTS: [f64; WINDOW] = [17000.0, 17150.0, 17200.0, 17100.0, 17250.0, 17300.0, 17280.0];

pub const LABELS: [&str; WINDOW] = ["T-6", "T-5", "T-4", "T-3", "T-2", "T-1", "Now"];

/// # Summary
/// 固定容量的滚动窗口。
///
/// # Invariants
/// - 存储在初始化时一次性分配，之后不再扩容。
/// - 写满后每次写入覆盖最旧的元素。
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    data: Vec<T>,
    capacity: usize,
    // 写满后下一次覆盖的位置，也即最旧元素的位置
    cursor: usize,
}

impl<T: Clone> RollingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// # Summary
    /// 写入新元素。
    ///
    /// # Logic
    /// 1. 未满时直接追加。
    /// 2. 已满时覆盖 cursor 处的元素并前移 cursor。
    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.data.len() < self.capacity {
            self.data.push(item);
        } else {
            self.data[self.cursor] = item;
            self.cursor = (self.cursor + 1) % self.capacity;
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn last(&self) -> Option<&T> {
        if self.data.is_empty() {
            return None;
        }
        if self.data.len() < self.capacity {
            self.data.last()
        } else {
            let idx = (self.cursor + self.capacity - 1) % self.capacity;
            self.data.get(idx)
        }
    }

    /// 按写入顺序返回全部元素
    pub fn to_vec(&self) -> Vec<T> {
        let mut result = Vec::with_capacity(self.data.len());
        result.extend(self.data[self.cursor..].iter().cloned());
        result.extend(self.data[..self.cursor].iter().cloned());
        result
    }
}

/// # Summary
/// 大盘指数迷你走势图。
///
/// # Invariants
/// - 序列长度恒为 `WINDOW`，以默认点位预填。
/// - 只接受有限的正数价格。
#[derive(Debug, Clone)]
pub struct IndexChart {
    points: RollingWindow<f64>,
}

impl Default for IndexChart {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexChart {
    pub fn new() -> Self {
        let mut points = RollingWindow::new(WINDOW);
        for p in DEFAULT_POINTS {
            points.push(p);
        }
        Self { points }
    }

    /// 写入最新价格，非法值被忽略并返回 false
    pub fn push(&mut self, price: f64) -> bool {
        if !price.is_finite() || price <= 0.0 {
            return false;
        }
        self.points.push(price);
        true
    }

    pub fn series(&self) -> Vec<f64> {
        self.points.to_vec()
    }

    pub fn labels(&self) -> [&'static str; WINDOW] {
        LABELS
    }

    pub fn latest(&self) -> Option<f64> {
        self.points.last().copied()
    }
}
